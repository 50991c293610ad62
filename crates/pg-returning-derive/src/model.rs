//! Model derive macro implementation

use crate::from_row::get_column_name;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let table_name = get_table_name(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let mut column_names = Vec::with_capacity(fields.len());
    let mut value_arms = Vec::with_capacity(fields.len());
    let mut apply_arms = Vec::with_capacity(fields.len());
    let mut pk: Option<(String, syn::Ident, syn::Type)> = None;

    for field in fields.iter() {
        let field_ident = field.ident.clone().unwrap();
        let column_name = get_column_name(field);

        if is_id_field(field) {
            if pk.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Model allows only one #[orm(id)] field",
                ));
            }
            pk = Some((column_name.clone(), field_ident.clone(), field.ty.clone()));
        }

        column_names.push(column_name.clone());
        value_arms.push(quote! {
            #column_name => Some(pg_returning::Param::new(self.#field_ident.clone()))
        });
        apply_arms.push(quote! {
            #column_name => self.#field_ident = row.try_get_column(#column_name)?
        });
    }

    let Some((pk_column, pk_ident, pk_type)) = pk else {
        return Err(syn::Error::new_spanned(
            &input,
            "Model requires one field marked with #[orm(id)]",
        ));
    };

    Ok(quote! {
        impl #impl_generics pg_returning::Model for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table_name;
            const COLUMNS: &'static [&'static str] = &[#(#column_names),*];
            const PRIMARY_KEY: &'static str = #pk_column;
            type Pk = #pk_type;

            fn pk(&self) -> Self::Pk {
                self.#pk_ident.clone()
            }

            fn value_of(&self, column: &str) -> Option<pg_returning::Param> {
                match column {
                    #(#value_arms,)*
                    _ => None,
                }
            }

            fn apply_row(&mut self, row: &tokio_postgres::Row) -> pg_returning::Result<()> {
                use pg_returning::RowExt;
                for column in row.columns() {
                    match column.name() {
                        #(#apply_arms,)*
                        _ => {}
                    }
                }
                Ok(())
            }
        }
    })
}

fn get_table_name(input: &DeriveInput) -> Result<String> {
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            if let Ok(nested) = attr.parse_args::<syn::MetaNameValue>() {
                if nested.path.is_ident("table") {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) = &nested.value
                    {
                        return Ok(lit.value());
                    }
                }
            }
        }
    }
    Err(syn::Error::new_spanned(
        input,
        "Model requires #[orm(table = \"...\")] on the struct",
    ))
}

fn is_id_field(field: &syn::Field) -> bool {
    for attr in &field.attrs {
        if attr.path().is_ident("orm") {
            if let Ok(path) = attr.parse_args::<syn::Path>() {
                if path.is_ident("id") {
                    return true;
                }
            }
        }
    }
    false
}
