//! Procedural macros shared by the geopixel crates.

mod args;

use args::ContextArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{ToTokens, quote};
use syn::{ItemFn, ReturnType, parse_macro_input};

/// Wraps the error of a function returning `anyhow::Result` with a formatted message.
///
/// ```ignore
/// #[context("reading layer '{}'", layer)]
/// fn read_layer(layer: &str) -> Result<()> { ... }
/// ```
///
/// The message is formatted after the body ran, so arguments that the body consumes must be
/// captured with `move`: `#[context(move, "...")]`.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs { capture, message } = parse_macro_input!(args as ContextArgs);
	let mut function = parse_macro_input!(input as ItemFn);

	if let Some(token) = function.sig.asyncness {
		return syn::Error::new_spanned(token, "#[context] does not support async functions")
			.to_compile_error()
			.into();
	}

	let output = match &function.sig.output {
		ReturnType::Type(_, output) => output.clone(),
		ReturnType::Default => {
			return syn::Error::new_spanned(&function.sig, "#[context] requires a function returning a Result")
				.to_compile_error()
				.into();
		}
	};

	let body = &function.block;
	let error = Ident::new("error", Span::mixed_site());
	let once = Ident::new("once", Span::mixed_site());

	// the closure takes ownership of `once`, which makes it `FnOnce` and keeps borrowck happy
	// with bodies that move out of captured variables
	let wrapped = quote! {
		{
			let #once = ::std::string::String::new();
			(#capture || -> #output {
				::core::mem::drop(#once);
				#body
			})()
			.map_err(|#error| #error.context(format!(#message)))
		}
	};

	match syn::parse2(wrapped) {
		Ok(block) => function.block = Box::new(block),
		Err(err) => return err.to_compile_error().into(),
	}

	function.into_token_stream().into()
}
