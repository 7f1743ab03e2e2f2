//! FromRow derive macro implementation

use crate::common::named_fields;
use crate::model::attrs::field_attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let fields = named_fields(&input, "FromRow")?;

    let mut index: usize = 0;
    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        if field_attrs(field)?.skip {
            field_extracts.push(quote! {
                #field_name: ::core::default::Default::default()
            });
        } else {
            field_extracts.push(quote! {
                #field_name: row.get(#index)?
            });
            index += 1;
        }
    }

    Ok(quote! {
        impl #impl_generics minorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &minorm::Row) -> minorm::OrmResult<Self> {
                row.expect_len(#index)?;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
