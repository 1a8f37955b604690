//! User-facing message catalog
//!
//! Every message a client may see lives here, selected once at startup by
//! `Config.locale`. Handlers never hardcode user-facing text inline.
//!
//! Vietnamese is the default locale; English is available for deployments
//! behind a translating storefront.

/// Message catalog for one locale
#[derive(Debug, Clone)]
pub struct Messages {
    // Cart
    pub login_to_sync_cart: &'static str,
    pub invalid_product_data: &'static str,
    pub cart_not_found: &'static str,
    pub item_not_found: &'static str,
    pub cart_cleared: &'static str,

    // Orders
    pub customer_info_required: &'static str,
    pub order_items_required: &'static str,
    pub invalid_total: &'static str,
    pub order_not_found: &'static str,
    pub status_required: &'static str,
    pub invalid_status: &'static str,
    pub cancel_reason_required: &'static str,
    pub cannot_cancel: &'static str,
    pub not_your_order: &'static str,
    pub order_cancelled: &'static str,
    pub order_deleted: &'static str,

    // Auth
    pub credentials_required: &'static str,
    pub invalid_credentials: &'static str,
    pub email_taken: &'static str,
    pub invalid_email: &'static str,

    // Catalog
    pub product_not_found: &'static str,
    pub product_deleted: &'static str,

    // Line item defaults for unset color/size
    pub default_color: &'static str,
    pub default_size: &'static str,
}

impl Messages {
    /// Vietnamese catalog (source market)
    pub fn vi() -> Self {
        Self {
            login_to_sync_cart: "Vui lòng đăng nhập để đồng bộ giỏ hàng",
            invalid_product_data: "Dữ liệu sản phẩm không hợp lệ",
            cart_not_found: "Không tìm thấy giỏ hàng",
            item_not_found: "Không tìm thấy sản phẩm trong giỏ hàng",
            cart_cleared: "Đã xóa giỏ hàng thành công",

            customer_info_required: "Vui lòng điền đầy đủ thông tin khách hàng",
            order_items_required: "Đơn hàng phải có ít nhất 1 sản phẩm",
            invalid_total: "Tổng tiền không hợp lệ",
            order_not_found: "Không tìm thấy đơn hàng",
            status_required: "Trạng thái không được để trống",
            invalid_status: "Trạng thái không hợp lệ",
            cancel_reason_required: "Vui lòng chọn lý do hủy đơn",
            cannot_cancel: "Không thể hủy đơn hàng đã được xác nhận hoặc đang giao",
            not_your_order: "Bạn không có quyền hủy đơn hàng này",
            order_cancelled: "Đã hủy đơn hàng thành công",
            order_deleted: "Đã xóa đơn hàng thành công",

            credentials_required: "Vui lòng nhập email và mật khẩu",
            invalid_credentials: "Email hoặc mật khẩu không đúng",
            email_taken: "Email đã được sử dụng",
            invalid_email: "Email không hợp lệ",

            product_not_found: "Không tìm thấy sản phẩm",
            product_deleted: "Đã xóa sản phẩm thành công",

            default_color: "Mặc định",
            default_size: "One Size",
        }
    }

    /// English catalog
    pub fn en() -> Self {
        Self {
            login_to_sync_cart: "Please login to sync cart",
            invalid_product_data: "Invalid product data",
            cart_not_found: "Cart not found",
            item_not_found: "Item not found in cart",
            cart_cleared: "Cart cleared successfully",

            customer_info_required: "Please fill in all customer information",
            order_items_required: "An order must contain at least one item",
            invalid_total: "Invalid order total",
            order_not_found: "Order not found",
            status_required: "Status must not be empty",
            invalid_status: "Invalid order status",
            cancel_reason_required: "Please choose a cancellation reason",
            cannot_cancel: "Orders that are confirmed or shipping can no longer be cancelled",
            not_your_order: "You are not allowed to cancel this order",
            order_cancelled: "Order cancelled successfully",
            order_deleted: "Order deleted successfully",

            credentials_required: "Email and password required",
            invalid_credentials: "Invalid email or password",
            email_taken: "Email already exists",
            invalid_email: "Invalid email address",

            product_not_found: "Product not found",
            product_deleted: "Product deleted successfully",

            default_color: "Default",
            default_size: "One Size",
        }
    }

    /// Select a catalog by locale tag; unknown tags fall back to Vietnamese
    pub fn for_locale(locale: &str) -> Self {
        match locale {
            "en" => Self::en(),
            _ => Self::vi(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_locales_define_every_message() {
        for msgs in [Messages::vi(), Messages::en()] {
            assert!(!msgs.cart_not_found.is_empty());
            assert!(!msgs.order_not_found.is_empty());
            assert!(!msgs.cannot_cancel.is_empty());
            assert!(!msgs.default_color.is_empty());
            assert!(!msgs.default_size.is_empty());
        }
    }

    #[test]
    fn unknown_locale_falls_back_to_vietnamese() {
        let msgs = Messages::for_locale("de");
        assert_eq!(msgs.default_color, Messages::vi().default_color);
    }
}
