//! Field name translation between entity properties and index fields.
//!
//! Entity properties are camelCase; indexed documents use snake_case.

/// Converts a camelCase property name into its underscore-separated field name.
///
/// Every uppercase letter is preceded by `_` and lowercased. Nothing else is
/// touched, so names that are already snake_case pass through unchanged.
///
/// ```
/// use helios_search_repository::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("createdAt"), "created_at");
/// assert_eq!(camel_to_snake("id"), "id");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
