use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

impl ModelFieldReceiver {
	/// Whether the field is never read from a request body, i.e. it has
	/// `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
	fn is_server_assigned(&self) -> bool {
		self.attrs.iter().any(|attr| {
			let Meta::List(ref list) = attr.meta else {
				return false;
			};

			list.path.is_ident("serde")
				&& list.tokens.to_token_stream().into_iter().any(|token| {
					matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
				})
		})
	}
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let vis = &input.vis;
	let generics = &receiver.generics;
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
	let input_ident = format_ident!("{}Input", receiver.ident);
	let attrs = &receiver.attrs;

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(&input.ident, "#[model] expects a struct with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter(|field| !field.is_server_assigned())
		.filter_map(|field| Some((field, field.ident.as_ref()?)))
		.collect::<Vec<_>>();

	let input_fields = fields.iter().map(|(field, ident)| {
		let attrs = &field.attrs;
		let ty = &field.ty;
		let vis = &field.vis;

		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	let names = fields.iter().map(|(_, ident)| ident.to_string());

	quote! {
		#input

		#(#attrs)*
		#vis struct #input_ident #generics {
			#(
				#input_fields
			)*
		}

		impl #impl_generics crate::validation::Fields for #input_ident #ty_generics #where_clause {
			const FIELDS: &'static [&'static str] = &[#(#names),*];
		}
	}
	.into()
}
