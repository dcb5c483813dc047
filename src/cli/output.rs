use serde_json::json;

use super::{OutputFormat, View};
use crate::client::{ProductApi, ProductStore, StoreState, ToastLevel, UiEffect};
use crate::database::models::Product;

/// Print queued effects, then the requested slice of state
pub fn render<A: ProductApi>(
    output_format: &OutputFormat,
    store: &mut ProductStore<A>,
    view: View,
) -> anyhow::Result<()> {
    let effects = store.take_effects();
    let state = store.state();

    match output_format {
        OutputFormat::Json => {
            let data = match view {
                View::Products => json!(state.products),
                View::CurrentProduct => json!(state.current_product),
            };
            let response = json!({
                "success": state.error.is_none(),
                "error": state.error,
                "data": data,
                "effects": effects,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for effect in &effects {
                if let UiEffect::Toast { level, message } = effect {
                    match level {
                        ToastLevel::Success => println!("✓ {}", message),
                        ToastLevel::Error => eprintln!("✗ {}", message),
                    }
                }
            }
            render_text(state, view);
        }
    }
    Ok(())
}

fn render_text(state: &StoreState, view: View) {
    if let Some(error) = &state.error {
        eprintln!("Error: {}", error);
        return;
    }

    match view {
        View::Products if state.products.is_empty() => println!("No products found"),
        View::Products => {
            for product in &state.products {
                println!("{}", product_line(product));
            }
        }
        View::CurrentProduct => match &state.current_product {
            Some(product) => {
                println!("{}", product_line(product));
                println!("  image: {}", product.image);
                println!("  created: {}", product.created_at);
            }
            None => println!("Product not found"),
        },
    }
}

fn product_line(product: &Product) -> String {
    format!("#{:<5} {:<40} ${}", product.id, product.name, product.price)
}
