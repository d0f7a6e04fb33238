//! CSV serialization for order exports.
//!
//! Format: header `Reference Code,Product SKU,Quantity,Status,Created At`,
//! one row per order, timestamps as `YYYY-MM-DD HH:MM:SS`.

use uuid::Uuid;

use ordermill_orders::Order;

pub const CSV_HEADER: &str = "Reference Code,Product SKU,Quantity,Status,Created At";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one CSV row for an order.
///
/// The product SKU is passed in because orders only hold a product id; the
/// caller resolves it through its tenant-scoped product collection.
pub fn order_row(order: &Order, product_sku: Uuid) -> String {
    format!(
        "{},{},{},{},{}",
        order.reference_code,
        product_sku,
        order.quantity,
        order.status.label(),
        order.created_at.format(TIMESTAMP_FORMAT),
    )
}

/// Render a complete export document: header plus one row per order.
pub fn render(rows: &[(Order, Uuid)]) -> Vec<u8> {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for (order, sku) in rows {
        out.push_str(&order_row(order, *sku));
        out.push('\n');
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordermill_core::{ProductId, ProfileId, TenantId};

    fn order() -> Order {
        Order::new(TenantId::new(), ProductId::new(), ProfileId::new(), 3).unwrap()
    }

    #[test]
    fn document_has_header_plus_one_line_per_order() {
        let rows: Vec<_> = (0..5).map(|_| (order(), Uuid::new_v4())).collect();
        let bytes = render(&rows);
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<_> = text.trim_end().lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], CSV_HEADER);
    }

    #[test]
    fn row_contains_reference_sku_quantity_and_status_label() {
        let order = order();
        let sku = Uuid::new_v4();
        let row = order_row(&order, sku);

        let fields: Vec<_> = row.split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], order.reference_code.to_string());
        assert_eq!(fields[1], sku.to_string());
        assert_eq!(fields[2], "3");
        assert_eq!(fields[3], "Pending");
    }

    #[test]
    fn timestamps_use_the_fixed_format() {
        let order = order();
        let row = order_row(&order, Uuid::new_v4());
        let created = row.rsplit(',').next().unwrap();

        // e.g. 2026-08-27 13:45:02
        assert_eq!(created.len(), 19);
        assert_eq!(&created[4..5], "-");
        assert_eq!(&created[10..11], " ");
        assert_eq!(&created[13..14], ":");
    }
}
