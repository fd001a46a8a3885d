//! WhatsApp checkout link
//!
//! Builds `https://wa.me/{number}?text={message}` click-to-chat links that
//! hand the cart over to the store's WhatsApp.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::OrderItem;
use shared::models::order::to_f64;

/// Customer side of the handoff
#[derive(Debug, Clone, Default)]
pub struct CheckoutContact<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub note: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLink {
    pub whatsapp_url: String,
    pub message: String,
    pub total: f64,
}

/// Digits only; `wa.me` takes the international number without `+`
pub fn wa_number(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Format an amount with thousands separators, dropping `.00`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    if frac == "00" {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Order summary sent as the chat's first message
pub fn checkout_message(store_name: &str, items: &[OrderItem], contact: &CheckoutContact<'_>) -> String {
    let mut lines = Vec::with_capacity(items.len() + 6);
    lines.push(format!("Hello {}, I would like to order:", store_name));
    for item in items {
        lines.push(format!(
            "- {} x {} = {}",
            item.name,
            item.quantity,
            format_amount(to_f64(item.subtotal()))
        ));
    }
    let total: Decimal = shared::models::items_total(items);
    lines.push(format!("Total: {}", format_amount(to_f64(total))));
    lines.push(format!("Name: {}", contact.name.trim()));
    lines.push(format!("Phone: {}", contact.phone.trim()));
    if let Some(note) = contact.note.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("Note: {}", note));
    }
    lines.join("\n")
}

/// Click-to-chat link for the given cart
pub fn build_checkout_link(
    store_number: &str,
    store_name: &str,
    items: &[OrderItem],
    contact: &CheckoutContact<'_>,
) -> CheckoutLink {
    let message = checkout_message(store_name, items, contact);
    let whatsapp_url = format!(
        "https://wa.me/{}?text={}",
        wa_number(store_number),
        urlencoding::encode(&message)
    );
    CheckoutLink {
        whatsapp_url,
        message,
        total: to_f64(shared::models::items_total(items)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItemStatus;

    fn item(name: &str, price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            price,
            quantity,
            status: OrderItemStatus::Pending,
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(4500.0), "4,500");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
    }

    #[test]
    fn test_wa_number() {
        assert_eq!(wa_number("+234 (800) 000-0000"), "2348000000000");
    }

    #[test]
    fn test_message_lines() {
        let contact = CheckoutContact {
            name: "Ada",
            phone: "0803 123 4567",
            note: Some("  "),
        };
        let msg = checkout_message(
            "BRANA KIDS",
            &[item("Romper", 4500.0, 2), item("Bib", 500.0, 1)],
            &contact,
        );
        assert_eq!(
            msg,
            "Hello BRANA KIDS, I would like to order:\n\
             - Romper x 2 = 9,000\n\
             - Bib x 1 = 500\n\
             Total: 9,500\n\
             Name: Ada\n\
             Phone: 0803 123 4567"
        );
    }

    #[test]
    fn test_link_is_percent_encoded() {
        let contact = CheckoutContact {
            name: "Ada & Co",
            phone: "0803",
            note: Some("Gift wrap"),
        };
        let link = build_checkout_link("+234 800 000 0000", "BRANA KIDS", &[item("Tutu", 100.0, 1)], &contact);
        assert!(link.whatsapp_url.starts_with("https://wa.me/2348000000000?text="));
        let encoded = link.whatsapp_url.split_once("?text=").unwrap().1;
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('\n'));
        assert_eq!(urlencoding::decode(encoded).unwrap(), link.message);
        assert!(link.message.ends_with("Note: Gift wrap"));
        assert_eq!(link.total, 100.0);
    }
}
