mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the summary, the remaining lines the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates an `XInput` struct for the model, used as the request body when creating
/// or replacing a record.
///
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are left out, all other
/// fields are included verbatim (including attributes). The input also implements
/// `crate::validation::Fields`, listing its fields in declaration order.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
