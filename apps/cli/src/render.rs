//! Plain-text rendering of the basket for the terminal.

use std::fmt::Write;

use brasa_api::ValidationReport;
use brasa_basket::BasketView;

use crate::config::DisplayConfig;

pub fn render_basket(view: &BasketView, display: &DisplayConfig) -> String {
    if view.is_empty() {
        return "Basket is empty".to_string();
    }

    let mut out = String::new();
    if let Some(cart_id) = &view.cart_id {
        let _ = writeln!(out, "Cart {}", cart_id);
    }

    for line in &view.lines {
        let name = line.product_name.as_deref().unwrap_or(&line.product_id);
        let _ = writeln!(
            out,
            "  [{}] {}x {:<24} {:>12}",
            line.item_id,
            line.quantity,
            name,
            display.format_currency(line.display_total.cents())
        );
        if !line.extras_total.is_zero() {
            let _ = writeln!(out, "      extras {}", display.format_currency(line.extras_total.cents()));
        }
        if !line.modifications_total.is_zero() {
            let _ = writeln!(
                out,
                "      changes {}",
                display.format_currency(line.modifications_total.cents())
            );
        }
        if let Some(notes) = &line.notes {
            let _ = writeln!(out, "      note: {}", notes);
        }
    }

    let _ = write!(
        out,
        "Total ({} items): {}",
        view.totals.total_quantity,
        display.format_currency(view.total().cents())
    );
    out
}

pub fn render_report(report: &ValidationReport) -> String {
    if report.is_valid() {
        return "Basket is ready for checkout".to_string();
    }

    let mut out = String::from("Basket cannot go to checkout:");
    for issue in &report.issues {
        match &issue.item_id {
            Some(item_id) => {
                let _ = write!(out, "\n  [{}] {}", item_id, issue.message);
            }
            None => {
                let _ = write!(out, "\n  {}", issue.message);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brasa_api::ValidationIssue;
    use brasa_core::{BasketTotals, ErrorKind, Money, PricedLine};

    fn view() -> BasketView {
        BasketView {
            cart_id: Some("c-9".into()),
            lines: vec![PricedLine {
                item_id: "1".into(),
                product_id: "10".into(),
                product_name: Some("X-Brasa".into()),
                quantity: 2,
                notes: Some("sem cebola".into()),
                unit_price: Money::from_cents(2000),
                extras_total: Money::from_cents(400),
                modifications_total: Money::zero(),
                computed_total: Money::from_cents(4400),
                display_total: Money::from_cents(4400),
            }],
            totals: BasketTotals {
                item_count: 1,
                total_quantity: 2,
                lines_total: Money::from_cents(4400),
                server_total: None,
                display_total: Money::from_cents(4400),
            },
            ..BasketView::blank()
        }
    }

    #[test]
    fn test_render_basket() {
        let out = render_basket(&view(), &DisplayConfig::default());

        assert!(out.starts_with("Cart c-9\n"));
        assert!(out.contains("[1] 2x X-Brasa"));
        assert!(out.contains("R$ 44,00"));
        assert!(out.contains("extras R$ 4,00"));
        assert!(!out.contains("changes"));
        assert!(out.contains("note: sem cebola"));
        assert!(out.ends_with("Total (2 items): R$ 44,00"));

        assert_eq!(render_basket(&BasketView::blank(), &DisplayConfig::default()), "Basket is empty");
    }

    #[test]
    fn test_render_report() {
        assert_eq!(render_report(&ValidationReport::default()), "Basket is ready for checkout");

        let report = ValidationReport {
            issues: vec![ValidationIssue {
                item_id: Some("1".into()),
                code: Some("INSUFFICIENT_STOCK".into()),
                message: "Estoque insuficiente".into(),
                kind: ErrorKind::InsufficientStock,
            }],
        };
        assert_eq!(
            render_report(&report),
            "Basket cannot go to checkout:\n  [1] Estoque insuficiente"
        );
    }
}
