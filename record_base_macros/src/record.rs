use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr, Type};

/// A secondary index declared with `#[record(index(...))]`.
struct IndexDecl {
    name: String,
    hash_key: String,
    range_key: Option<String>,
}

/// Struct-level `#[record(...)]` options.
#[derive(Default)]
struct RecordAttrs {
    collection: Option<String>,
    indexes: Vec<IndexDecl>,
}

/// Field naming rules taken from `#[serde(rename_all = "...")]`.
#[derive(Clone, Copy)]
enum RenameRule {
    None,
    CamelCase,
    SnakeCase,
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = parse_record_attrs(input)?;

    let collection = attrs
        .collection
        .unwrap_or_else(|| format!("{}s", to_snake_case(&name.to_string())));

    let fields = named_fields(input)?;
    let meta_field = find_meta_field(input, fields)?;
    let rule = parse_rename_rule(input)?;

    let mut field_names = Vec::new();
    for field in fields {
        let ident = field.ident.as_ref().expect("named field");
        if ident == &meta_field || serde_skipped(field)? {
            continue;
        }
        field_names.push(serde_field_name(field, ident, rule)?);
    }

    let indexes = attrs.indexes.iter().map(|index| {
        let index_name = &index.name;
        let hash_key = &index.hash_key;
        let range_key = match &index.range_key {
            Some(key) => quote! { Some(#key) },
            None => quote! { None },
        };
        quote! {
            record_base::IndexSchema {
                name: #index_name,
                hash_key: #hash_key,
                range_key: #range_key,
            }
        }
    });

    Ok(quote! {
        impl record_base::Record for #name {
            const COLLECTION: &'static str = #collection;
            const FIELDS: &'static [&'static str] = &[#(#field_names),*];
            const INDEXES: &'static [record_base::IndexSchema] = &[#(#indexes),*];

            fn meta(&self) -> &record_base::RecordMeta {
                &self.#meta_field
            }

            fn meta_mut(&mut self) -> &mut record_base::RecordMeta {
                &mut self.#meta_field
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::punctuated::Punctuated<Field, syn::token::Comma>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(&fields.named);
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "Record derive: only structs with named fields are supported",
    ))
}

fn parse_record_attrs(input: &DeriveInput) -> syn::Result<RecordAttrs> {
    let mut attrs = RecordAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.collection = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("index") {
                let mut name = None;
                let mut hash_key = None;
                let mut range_key = None;
                meta.parse_nested_meta(|inner| {
                    let value: LitStr = inner.value()?.parse()?;
                    if inner.path.is_ident("name") {
                        name = Some(value.value());
                    } else if inner.path.is_ident("hash_key") {
                        hash_key = Some(value.value());
                    } else if inner.path.is_ident("range_key") {
                        range_key = Some(value.value());
                    } else {
                        return Err(inner.error("expected `name`, `hash_key` or `range_key`"));
                    }
                    Ok(())
                })?;
                let name = name.ok_or_else(|| meta.error("index requires `name`"))?;
                let hash_key = hash_key.ok_or_else(|| meta.error("index requires `hash_key`"))?;
                attrs.indexes.push(IndexDecl {
                    name,
                    hash_key,
                    range_key,
                });
                return Ok(());
            }
            Err(meta.error("expected `collection` or `index(...)`"))
        })?;
    }
    Ok(attrs)
}

/// The field holding `RecordMeta`: marked `#[record(meta)]`, or typed `RecordMeta`.
fn find_meta_field(
    input: &DeriveInput,
    fields: &syn::punctuated::Punctuated<Field, syn::token::Comma>,
) -> syn::Result<Ident> {
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            let mut is_meta = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("meta") {
                    is_meta = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `meta`"))
                }
            })?;
            if is_meta {
                return Ok(field.ident.clone().expect("named field"));
            }
        }
    }

    for field in fields {
        if let Type::Path(type_path) = &field.ty {
            let is_meta_type = type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "RecordMeta")
                .unwrap_or(false);
            if is_meta_type {
                return Ok(field.ident.clone().expect("named field"));
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Record derive: no field marked with #[record(meta)] and no field of type `RecordMeta`",
    ))
}

fn parse_rename_rule(input: &DeriveInput) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in &input.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                rule = match value.value().as_str() {
                    "camelCase" => RenameRule::CamelCase,
                    "snake_case" => RenameRule::SnakeCase,
                    other => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            format!("Record derive: unsupported rename_all rule `{}`", other),
                        ))
                    }
                };
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(rule)
}

fn serde_skipped(field: &Field) -> syn::Result<bool> {
    let mut skipped = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skipped = true;
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(skipped)
}

fn serde_field_name(field: &Field, ident: &Ident, rule: RenameRule) -> syn::Result<String> {
    let mut renamed = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                renamed = Some(value.value());
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }

    if let Some(name) = renamed {
        return Ok(name);
    }

    let raw = ident.to_string();
    let raw = raw.strip_prefix("r#").unwrap_or(&raw).to_string();
    Ok(match rule {
        RenameRule::None | RenameRule::SnakeCase => raw,
        RenameRule::CamelCase => to_camel_case(&raw),
    })
}

/// Consumes a serde option this derive does not care about.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut upper_next = false;
    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
