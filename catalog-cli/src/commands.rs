//! Command handlers

use anyhow::{Context, bail};
use catalog_client::filter::{DateRange, category_name};
use catalog_client::{
    CatalogGateway, ClientConfig, FilterState, GalleryStore, HttpGateway, LoadState,
    ProductStore, Session, StatusLabel, TokenStore, UploadStaging, facets, filter_products,
};
use chrono::{DateTime, Utc};
use shared::models::{CategoryCreate, CategoryUpdate, GalleryQuery};
use std::sync::Arc;

use crate::cli::{CategoryCommand, GalleryCommand, ProductCommand, ProductFilterArgs};

fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

fn open(config: &ClientConfig, tokens: &TokenStore) -> anyhow::Result<(Arc<HttpGateway>, Session)> {
    let gateway = config
        .build_gateway()
        .with_context(|| format!("cannot use backend {}", config.base_url))?;
    let session = tokens.session(&config.token_key)?;
    if !session.is_logged_in() {
        tracing::debug!("no stored token, requests go out unauthenticated");
    } else if session.is_expired(now_unix()) {
        tracing::warn!("stored token has expired, run `catalog login` again");
    }
    Ok((Arc::new(gateway), session))
}

fn ensure_loaded(state: LoadState) -> anyhow::Result<()> {
    match state {
        LoadState::Errored(message) => bail!(message),
        _ => Ok(()),
    }
}

// ========== Session ==========

pub fn login(tokens: &TokenStore, config: &ClientConfig, token: &str) -> anyhow::Result<()> {
    let session = Session::with_token(token.trim());
    if let Err(e) = session.claims() {
        tracing::warn!(error = %e, "token payload is not readable, storing it anyway");
    }
    tokens.store(&config.token_key, token.trim())?;
    println!("Token saved to {}", tokens.file_path().display());
    Ok(())
}

pub fn logout(tokens: &TokenStore, config: &ClientConfig) -> anyhow::Result<()> {
    if tokens.remove(&config.token_key)? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub fn whoami(tokens: &TokenStore, config: &ClientConfig) -> anyhow::Result<()> {
    let session = tokens.session(&config.token_key)?;
    let Some(claims) = session.claims()? else {
        println!("Not logged in");
        return Ok(());
    };
    println!("name:  {}", claims.name.as_deref().unwrap_or("-"));
    println!("email: {}", claims.email.as_deref().unwrap_or("-"));
    println!("role:  {}", claims.role);
    if let Some(exp) = claims.exp {
        let expires = DateTime::<Utc>::from_timestamp(exp as i64, 0)
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| exp.to_string());
        let note = if session.is_expired(now_unix()) { " (expired)" } else { "" };
        println!("expires: {expires}{note}");
    }
    Ok(())
}

// ========== Products ==========

fn filter_state(args: &ProductFilterArgs) -> FilterState {
    FilterState {
        categories: args.categories.clone(),
        statuses: args.statuses.clone(),
        brands: args.brands.clone(),
        min_price: args.min_price,
        max_price: args.max_price,
        min_stock: args.min_stock,
        max_stock: args.max_stock,
        min_rating: args.rating,
        created: DateRange::days(args.from, args.to),
    }
}

pub async fn products(
    config: &ClientConfig,
    tokens: &TokenStore,
    cmd: ProductCommand,
) -> anyhow::Result<()> {
    let (gateway, session) = open(config, tokens)?;
    let store = ProductStore::new(gateway, session);

    match cmd {
        ProductCommand::List(args) => {
            ensure_loaded(store.load().await)?;
            let filters = filter_state(&args);
            let (rows, total) = store
                .view(|products, categories| {
                    let rows: Vec<String> =
                        filter_products(products, categories, &args.search, &filters)
                            .into_iter()
                            .map(|p| {
                                format!(
                                    "{:<26} {:<32} {:>10} {:>6}  {:<12} {}",
                                    p.id,
                                    p.name,
                                    p.price,
                                    p.stock,
                                    StatusLabel::of(p),
                                    category_name(p, categories).unwrap_or("-"),
                                )
                            })
                            .collect();
                    (rows, products.len())
                })
                .await;
            for row in &rows {
                println!("{row}");
            }
            println!(
                "{} of {} product(s), {} filter(s) active",
                rows.len(),
                total,
                filters.active_count()
            );
        }
        ProductCommand::Facets => {
            ensure_loaded(store.load().await)?;
            let facets = store.view(facets).await;
            println!("{}", serde_json::to_string_pretty(&facets)?);
        }
        ProductCommand::Delete { ids } => {
            let report = store.bulk_delete(&ids).await;
            for item in &report.failed {
                eprintln!("  {}: {}", item.id, item.reason);
            }
            if !report.success {
                bail!(report.message);
            }
            println!("{}", report.message);
        }
    }
    Ok(())
}

// ========== Categories ==========

pub async fn categories(
    config: &ClientConfig,
    tokens: &TokenStore,
    cmd: CategoryCommand,
) -> anyhow::Result<()> {
    let (gateway, session) = open(config, tokens)?;

    match cmd {
        CategoryCommand::List { search } => {
            let envelope = match search.as_deref() {
                Some(term) => gateway.search_categories(term).await?,
                None => gateway.list_categories().await?,
            };
            if !envelope.success {
                bail!(envelope.message_or("Failed to load categories"));
            }
            for category in envelope.data.unwrap_or_default() {
                let flag = if category.is_active { "" } else { "  (inactive)" };
                println!("{:<26} {}{flag}", category.id, category.name);
            }
        }
        CategoryCommand::Create {
            name,
            description,
            image,
        } => {
            let store = ProductStore::new(gateway, session);
            let outcome = store
                .create_category(&CategoryCreate {
                    name,
                    description,
                    image,
                    ..Default::default()
                })
                .await;
            if !outcome.success {
                bail!(outcome.message);
            }
            let id = outcome.item.map(|c| c.id).unwrap_or_default();
            println!("{} ({id})", outcome.message);
        }
        CategoryCommand::Update {
            id,
            name,
            description,
            active,
        } => {
            let store = ProductStore::new(gateway, session);
            let outcome = store
                .update_category(
                    &id,
                    &CategoryUpdate {
                        name,
                        description,
                        is_active: active,
                        ..Default::default()
                    },
                )
                .await;
            if !outcome.success {
                bail!(outcome.message);
            }
            println!("{}", outcome.message);
        }
        CategoryCommand::Delete { id } => {
            let store = ProductStore::new(gateway, session);
            let outcome = store.delete_category(&id).await;
            if !outcome.success {
                bail!(outcome.message);
            }
            println!("{}", outcome.message);
        }
    }
    Ok(())
}

// ========== Gallery ==========

/// `--name` indexes count command-line files; `positions[i]` is where
/// file `i` was staged, `None` when it was skipped
fn apply_names(
    staging: &mut UploadStaging,
    positions: &[Option<usize>],
    names: Vec<(usize, String)>,
) {
    for (index, name) in names {
        match positions.get(index).copied() {
            Some(Some(staged)) => {
                staging.rename(staged, name);
            }
            Some(None) => tracing::warn!(index, "file was skipped, name ignored"),
            None => tracing::warn!(index, "no file at this index"),
        }
    }
}

pub async fn gallery(
    config: &ClientConfig,
    tokens: &TokenStore,
    cmd: GalleryCommand,
) -> anyhow::Result<()> {
    let (gateway, session) = open(config, tokens)?;
    let store = GalleryStore::new(gateway, session);

    match cmd {
        GalleryCommand::List { search } => {
            let query = GalleryQuery {
                search_term: search.filter(|s| !s.trim().is_empty()),
                ..Default::default()
            };
            ensure_loaded(store.load(&query).await)?;
            for image in store.images().await {
                let flag = if image.is_active { "" } else { "  (inactive)" };
                println!(
                    "{:<26} {:<32} {:>9}  {}{flag}",
                    image.id, image.name, image.size, image.url
                );
            }
        }
        GalleryCommand::Upload { files, names } => {
            let mut staging = UploadStaging::new();
            let mut positions = Vec::with_capacity(files.len());
            for path in &files {
                match staging.stage_path(path).await {
                    Ok(staged) => positions.push(Some(staged)),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping file");
                        positions.push(None);
                    }
                }
            }
            apply_names(&mut staging, &positions, names);
            if staging.is_empty() {
                bail!("No valid image files to upload");
            }

            let outcome = store.upload(&staging.to_upload()).await;
            if !outcome.success {
                bail!(outcome.message);
            }
            for image in outcome.item.unwrap_or_default() {
                println!("{:<26} {}", image.id, image.url);
            }
            println!("{}", outcome.message);
        }
        GalleryCommand::Delete { ids } => {
            let message = if let [id] = ids.as_slice() {
                let outcome = store.delete(id).await;
                if !outcome.success {
                    bail!(outcome.message);
                }
                outcome.message
            } else {
                let outcome = store.bulk_delete(&ids).await;
                if !outcome.success {
                    bail!(outcome.message);
                }
                outcome.message
            };
            println!("{message}");
        }
        GalleryCommand::Toggle { id, active } => {
            let outcome = store.toggle_active(&id, active).await;
            if !outcome.success {
                bail!(outcome.message);
            }
            let state = if active { "active" } else { "inactive" };
            println!("{id} is now {state}");
        }
    }
    Ok(())
}
