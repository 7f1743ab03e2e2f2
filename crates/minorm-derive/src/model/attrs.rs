//! Attribute parsing for the derive macros.
//!
//! Handles parsing of struct-level and field-level `#[orm(...)]` attributes.

use syn::{DeriveInput, LitStr, Result};

/// Struct-level `#[orm(...)]` options.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<LitStr>,
    pub hooks: bool,
}

impl syn::parse::Parse for StructAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();

        // Comma-separated flags or key = "value" pairs
        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "hooks" {
                attr.hooks = true;
            } else if ident == "table" {
                let _: syn::Token![=] = input.parse()?;
                attr.table = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown struct attribute `{ident}`"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Field-level `#[orm(...)]` options.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub column: Option<LitStr>,
    pub tag: Option<LitStr>,
    pub skip: bool,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attr.skip = true;
            } else {
                let _: syn::Token![=] = input.parse()?;
                let value: LitStr = input.parse()?;
                if ident == "column" {
                    attr.column = Some(value);
                } else if ident == "tag" {
                    attr.tag = Some(value);
                } else {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown field attribute `{ident}`"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Merge every struct-level `#[orm(...)]` attribute.
pub(crate) fn struct_attrs(input: &DeriveInput) -> Result<StructAttr> {
    let mut merged = StructAttr::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: StructAttr = attr.parse_args()?;
        if parsed.table.is_some() {
            merged.table = parsed.table;
        }
        merged.hooks |= parsed.hooks;
    }
    Ok(merged)
}

/// Merge every `#[orm(...)]` attribute on a field.
pub(crate) fn field_attrs(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
        if parsed.tag.is_some() {
            merged.tag = parsed.tag;
        }
        merged.skip |= parsed.skip;
    }
    Ok(merged)
}
