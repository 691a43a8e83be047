//! # Commands
//!
//! One function per subcommand, each returning the text to print. The
//! basket is opened by the caller; every command except `logout` loads it
//! first.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use brasa_api::CartBackend;
use brasa_basket::{AddItem, BasketStore, Session, UpdateItem, UpdateOptions};

use crate::cli::Command;
use crate::config::DisplayConfig;
use crate::error::CliResult;
use crate::render::{render_basket, render_report};

pub async fn execute<B: CartBackend>(
    command: Command,
    basket: &Arc<BasketStore<B>>,
    display: &DisplayConfig,
) -> CliResult<String> {
    if !matches!(command, Command::Logout | Command::InitConfig) {
        basket.init().await?;
    }

    let output = match command {
        Command::Show { refresh } => {
            let view = if refresh {
                basket.refresh().await?
            } else {
                basket.snapshot().await
            };
            render_basket(&view, display)
        }

        Command::Add {
            product,
            qty,
            extras,
            modifications,
            notes,
        } => {
            let mut item = AddItem::new(product, qty);
            for (ingredient_id, quantity) in extras {
                item = item.with_extra(ingredient_id, quantity);
            }
            for (ingredient_id, delta) in modifications {
                item = item.with_modification(ingredient_id, delta);
            }
            if let Some(notes) = notes {
                item = item.with_notes(notes);
            }
            render_basket(&basket.add_to_basket(item).await?, display)
        }

        Command::SetQty { item, qty } => {
            let view = basket
                .update_basket_item(&item, UpdateItem::quantity(qty), UpdateOptions::default())
                .await?;
            render_basket(&view, display)
        }

        Command::Remove { item } => render_basket(&basket.remove_from_basket(&item).await?, display),

        Command::Clear => render_basket(&basket.clear_basket().await?, display),

        Command::Validate => render_report(&basket.validate_for_checkout().await?),

        Command::Login { token, name } => {
            let view = Session::new(basket.clone())
                .login(&token, &json!({ "name": name }))
                .await?;
            info!("Signed in from the command line");
            format!("Signed in\n{}", render_basket(&view, display))
        }

        Command::Logout => {
            Session::new(basket.clone()).logout().await?;
            "Signed out".to_string()
        }

        // Runs before the basket is opened.
        Command::InitConfig => String::new(),
    };

    Ok(output)
}
