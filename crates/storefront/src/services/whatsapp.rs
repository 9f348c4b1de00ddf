//! WhatsApp click-to-chat message and link.

use wholesale_core::Order;

use crate::config::WhatsAppConfig;

/// Order confirmation message sent to the customer, before encoding.
#[must_use]
pub fn message(order: &Order) -> String {
    let items: String = order
        .items
        .iter()
        .enumerate()
        .map(|(index, line)| {
            format!(
                "{}. {} - {} x {} = {}\n",
                index + 1,
                line.product.name,
                line.quantity,
                line.product.price,
                line.subtotal()
            )
        })
        .collect();

    format!(
        "Hello {name}!\n\n\
         Your order #{id} has been received:\n\n\
         📦 *Order Details:*\n\
         {items}\n\
         💰 *Total Amount: {total}*\n\n\
         📍 *Delivery Address:*\n{address}\n\n\
         Please reply with *YES* to confirm this order.\n\n\
         Thank you!",
        name = order.customer_name,
        id = order.id,
        total = order.total_amount,
        address = order.customer_address,
    )
}

/// Click-to-chat link opening a chat with the customer, message prefilled.
#[must_use]
pub fn link(order: &Order, config: &WhatsAppConfig) -> String {
    let number = config.dialing.normalize(&order.customer_phone);
    format!(
        "https://{}/{number}?text={}",
        config.domain,
        encode_component(&message(order))
    )
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
#[must_use]
pub fn encode_component(text: &str) -> String {
    // urlencoding leaves only `- _ . ~` unescaped; put back the rest of the
    // URI-component unreserved set.
    urlencoding::encode(text)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wholesale_core::{CartLine, NewOrder, OrderId, Phone, Price, ProductDraft, ProductId};

    fn sample_order() -> Order {
        let rice = ProductDraft {
            name: "Rice".to_owned(),
            price: Price::from_rupees(100),
            stock: 10,
            ..ProductDraft::default()
        }
        .into_product(ProductId::new("1"));

        let mut order = Order::place(
            NewOrder {
                customer_name: "Ali".to_owned(),
                customer_phone: Phone::parse("03001234567").unwrap(),
                customer_address: "Test St".to_owned(),
                items: vec![CartLine::new(rice, 2)],
                total_amount: Price::from_rupees(200),
            },
            Utc::now(),
        );
        order.id = OrderId::new("ORD-1");
        order
    }

    #[test]
    fn test_message_template() {
        let expected = "Hello Ali!\n\nYour order #ORD-1 has been received:\n\n\
                        📦 *Order Details:*\n1. Rice - 2 x Rs.100 = Rs.200\n\n\
                        💰 *Total Amount: Rs.200*\n\n📍 *Delivery Address:*\nTest St\n\n\
                        Please reply with *YES* to confirm this order.\n\nThank you!";
        assert_eq!(message(&sample_order()), expected);
    }

    #[test]
    fn test_link_number_and_encoding() {
        let url = link(&sample_order(), &WhatsAppConfig::default());

        assert!(url.starts_with("https://wa.me/923001234567?text=Hello%20Ali!%0A%0A"));
        assert!(url.contains("1.%20Rice%20-%202%20x%20Rs.100%20%3D%20Rs.200"));
        assert!(url.contains("*YES*"));
        assert!(url.contains("%F0%9F%93%A6"));
    }

    #[test]
    fn test_encode_component_unreserved() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_component("a b#c&d=e/f"), "a%20b%23c%26d%3De%2Ff");
    }

    #[test]
    fn test_fractional_prices_have_no_trailing_zeros() {
        let mut order = sample_order();
        order.items[0].product.price = Price::new(rust_decimal::Decimal::new(995, 1));
        let text = message(&order);
        assert!(text.contains("2 x Rs.99.5 = Rs.199"));
    }
}
