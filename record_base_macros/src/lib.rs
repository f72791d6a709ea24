mod record;

use proc_macro::TokenStream;

/// Derive macro for `record_base::Record`.
///
/// ```ignore
/// #[derive(Clone, Debug, Default, Serialize, Deserialize, Record)]
/// #[serde(rename_all = "camelCase")]
/// #[record(collection = "users", index(name = "by_email", hash_key = "email"))]
/// struct User {
///     #[serde(flatten)]
///     meta: RecordMeta,
///     email: String,
///     display_name: String,
/// }
/// ```
///
/// The collection defaults to the snake_case struct name plus `s`. The field
/// holding `RecordMeta` is found by `#[record(meta)]` or by its type, and the
/// remaining fields form the allow-list under their serde names.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
