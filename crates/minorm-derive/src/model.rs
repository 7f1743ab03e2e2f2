//! Model derive macro implementation

pub(crate) mod attrs;

use crate::common::named_fields;
use crate::sql_ident::parse_sql_ident;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "Model")?;
    let struct_attr = attrs::struct_attrs(&input)?;

    let table = match &struct_attr.table {
        Some(lit) => parse_sql_ident(lit, "table")?,
        None => name.to_string(),
    };

    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    let mut values = Vec::new();

    for field in fields {
        let attr = attrs::field_attrs(field)?;
        if attr.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        let column = match &attr.column {
            Some(lit) => parse_sql_ident(lit, "column")?,
            None => ident.to_string(),
        };
        if !seen.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column '{column}'"),
            ));
        }

        let tag = attr.tag.as_ref().map(|t| t.value()).unwrap_or_default();
        let ty = &field.ty;
        columns.push(quote! {
            minorm::ColumnDef::new(#column, <#ty as minorm::FieldType>::KIND, #tag)
        });
        values.push(quote! {
            minorm::FieldType::to_value(&self.#ident)
        });
    }

    let hooks_impl = if struct_attr.hooks {
        quote! {}
    } else {
        quote! {
            impl #impl_generics minorm::Hooks for #name #ty_generics #where_clause {}
        }
    };

    Ok(quote! {
        impl #impl_generics minorm::Model for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;

            fn columns() -> ::std::vec::Vec<minorm::ColumnDef> {
                ::std::vec![#(#columns),*]
            }

            fn values(&self) -> ::std::vec::Vec<minorm::Value> {
                ::std::vec![#(#values),*]
            }
        }

        #hooks_impl
    })
}
