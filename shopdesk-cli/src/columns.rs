//! Default column schema of each resource list.

use shopdesk_lib::api::Resource;
use shopdesk_lib::grid::Column;

pub fn for_resource(resource: Resource) -> Vec<Column> {
    match resource {
        Resource::Products => vec![
            Column::new("name", "Product Name").flex(1.5),
            Column::new("slug", "Slug"),
            Column::new("brand", "Brand"),
            Column::new("category", "Category"),
            Column::new("productType", "Type"),
            Column::number("totalStock", "Total Stock"),
            Column::number("rating", "Rating"),
        ],
        Resource::Categories => vec![
            Column::new("name", "Category Name").flex(1.5),
            Column::new("slug", "Slug"),
            Column::new("parent", "Parent Category"),
            Column::number("level", "Level"),
            Column::boolean("isActive", "Status"),
            Column::number("displayOrder", "Display Order"),
            Column::date("createdAt", "Created At"),
        ],
        Resource::Banners => vec![
            Column::new("bannerImages", "Images")
                .flex(2.0)
                .sortable(false)
                .filterable(false),
            Column::number("imageCount", "Total Images"),
            Column::date("createdAt", "Created At"),
            Column::date("updatedAt", "Updated At"),
        ],
        Resource::Offers => vec![
            Column::new("offerName", "Offer Name").flex(1.5),
            Column::new("couponCode", "Coupon Code"),
            Column::new("discountType", "Discount"),
            Column::new("discountedItemsType", "Applies To"),
            Column::number("minCartValue", "Min Cart Value"),
            Column::number("uptoAmountLimit", "Max Discount"),
            Column::boolean("isActive", "Status"),
            Column::date("startDateTime", "Start Date"),
            Column::date("expiryDateTime", "Expiry Date"),
        ],
        Resource::Orders => vec![
            Column::new("_id", "Order ID"),
            Column::new("user.fullName", "Customer").flex(1.5),
            Column::number("totalAmount", "Total Amount"),
            Column::new("orderStatus", "Order Status"),
            Column::new("status", "Payment Status"),
            Column::new("paymentType", "Payment Type"),
            Column::date("createdAt", "Order Date"),
        ],
        Resource::Users => vec![
            Column::new("fullName", "Name").flex(1.5),
            Column::new("email", "Email").flex(1.5),
            Column::new("phoneNumber", "Phone"),
            Column::new("role", "Role"),
            Column::boolean("isActive", "Active"),
            Column::boolean("isVerified", "Verified"),
            Column::date("createdAt", "Created At"),
            Column::date("lastLogin", "Last Login"),
        ],
    }
}
