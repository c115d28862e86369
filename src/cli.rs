// src/cli.rs

use std::path::Path;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tabled::{builder::Builder, settings::Style};

use crate::api_client::HttpCatalogApi;
use crate::category::Category;
use crate::errors::AppError;
use crate::form_controller::ProductFormController;
use crate::list_controller::ProductListController;
use crate::models::{ImageAttachment, ProductSummary};
use crate::ports::{ConsoleNavigator, ConsoleNotifier, PromptConfirmer};
use crate::state::{ApiConfig, AppState};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-admin",
    about = "Panel administracyjny katalogu produktów",
    long_about = None
)]
pub struct Cli {
    /// Adres API katalogu
    #[arg(long, global = true, env = "CATALOG_API_URL")]
    api_url: Option<String>,

    /// Limit czasu żądań w sekundach
    #[arg(long, global = true, env = "CATALOG_API_TIMEOUT_SECS")]
    timeout_secs: Option<String>,

    /// Nie pytaj o potwierdzenie usunięcia
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Tabela wszystkich produktów
    List,
    /// Usuwa produkt po ID
    Delete { id: i64 },
    /// Wyznacza formularz edycji dla produktu z listy
    Edit { id: i64 },
    /// Ścieżka pustego formularza danej kategorii
    New { category: Category },
    /// Wczytuje produkt, zmienia pola i zapisuje
    Update {
        id: i64,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Tworzy nowy produkt
    Create {
        #[command(flatten)]
        form: FormArgs,
    },
}

#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    category: Category,

    /// Pole produktu: `nazwa=wartość`
    #[arg(long = "set", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,

    /// Pole wariantu: `indeks:nazwa=wartość`
    #[arg(long = "variant", value_parser = parse_variant_assignment)]
    variants: Vec<(usize, String, String)>,

    /// Liczba pustych wariantów do dopisania
    #[arg(long, default_value_t = 0)]
    add_variants: usize,

    /// Plik obrazka; wymusza wysyłkę multipart
    #[arg(long)]
    image: Option<std::path::PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("oczekiwano `nazwa=wartość`, otrzymano '{}'", raw))
}

fn parse_variant_assignment(raw: &str) -> Result<(usize, String, String), String> {
    let (index, assignment) = raw
        .split_once(':')
        .ok_or_else(|| format!("oczekiwano `indeks:nazwa=wartość`, otrzymano '{}'", raw))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("nieprawidłowy indeks wariantu '{}'", index))?;
    let (name, value) = parse_assignment(assignment)?;
    Ok((index, name, value))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_image(path: &Path) -> Result<ImageAttachment, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::error!("Nie można wczytać obrazka {}: {}", path.display(), e);
        AppError::Io(e)
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "img".to_string());
    Ok(ImageAttachment {
        file_name,
        mime_type: mime_for(path).to_string(),
        bytes,
    })
}

fn render_table(products: &[ProductSummary]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID",
        "Name",
        "Brand",
        "Sale",
        "In Stock",
        "After Price",
        "Before Price",
    ]);
    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone().unwrap_or_default(),
            product.brand_name.clone().unwrap_or_default(),
            product.sale_label().to_string(),
            product.stock_label().to_string(),
            product.after_price_label(),
            product.before_price_label(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

impl Cli {
    pub async fn run(self) -> Result<(), AppError> {
        let config = ApiConfig::from_values(self.api_url, self.timeout_secs)?;
        tracing::debug!("API katalogu: {}", config.base_url);

        let state = AppState {
            api: Arc::new(HttpCatalogApi::new(&config)?),
            notifier: Arc::new(ConsoleNotifier),
            navigator: Arc::new(ConsoleNavigator),
            confirmer: Arc::new(PromptConfirmer {
                assume_yes: self.yes,
            }),
        };

        match self.command {
            Commands::List => {
                let mut list = ProductListController::new(state);
                list.load_summaries().await?;
                tracing::debug!("Stan listy: {:?}", list.status());
                println!("{}", render_table(list.products()));
            }
            Commands::Delete { id } => {
                let mut list = ProductListController::new(state);
                list.delete(id).await?;
            }
            Commands::Edit { id } => {
                let mut list = ProductListController::new(state);
                list.load_summaries().await?;
                let summary = list.find(id).cloned().ok_or(AppError::NotFound)?;
                list.resolve_edit_target(&summary).await?;
            }
            Commands::New { category } => {
                let list = ProductListController::new(state);
                list.create_target(category);
            }
            Commands::Update { id, form } => {
                let mut controller = ProductFormController::new(state, form.category);
                controller.load(id).await?;
                run_form(controller, form).await?;
            }
            Commands::Create { form } => {
                let controller = ProductFormController::new(state, form.category);
                run_form(controller, form).await?;
            }
        }
        Ok(())
    }
}

async fn run_form(mut controller: ProductFormController, form: FormArgs) -> Result<(), AppError> {
    controller.load_reference_options().await;
    tracing::debug!(
        "Dostępne marki: {}, typy: {}",
        controller.brands().len(),
        controller.type_options().len()
    );
    if let Some(type_field) = form.category.descriptor().type_field
        && controller.type_options().is_empty()
    {
        tracing::warn!("Brak opcji do wyboru dla pola {}", type_field);
    }

    for (name, value) in &form.fields {
        controller.set_field_by_name(name, value)?;
    }
    for _ in 0..form.add_variants {
        controller.add_variant();
    }
    for (index, name, value) in &form.variants {
        controller.set_variant_field_by_name(*index, name, value)?;
    }
    if let Some(path) = &form.image {
        controller.attach_image(read_image(path).await?);
    }

    let blank = controller
        .draft()
        .variants()
        .iter()
        .filter(|variant| variant.is_blank())
        .count();
    if blank > 0 {
        tracing::warn!("Formularz zawiera {} pustych wariantów", blank);
    }

    tracing::info!("Zapis formularza (ID: {:?})", controller.id());
    controller.submit().await
}
