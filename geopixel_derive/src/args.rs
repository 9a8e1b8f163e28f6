use proc_macro2::TokenStream;
use syn::{
	Token,
	parse::{Parse, ParseStream, Result},
};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
#[derive(Debug)]
pub struct ContextArgs {
	pub capture: Option<Token![move]>,
	pub message: TokenStream,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> Result<Self> {
		let capture = if input.peek(Token![move]) {
			let capture = input.parse()?;
			input.parse::<Token![,]>()?;
			Some(capture)
		} else {
			None
		};
		Ok(ContextArgs {
			capture,
			message: input.parse()?,
		})
	}
}
