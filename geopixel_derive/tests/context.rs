use anyhow::{Result, bail, ensure};
use geopixel_derive::context;

#[context("parsing '{}'", text)]
fn parse_number(text: &str) -> Result<u32> {
	Ok(text.parse::<u32>()?)
}

#[context("checking layer {index}")]
fn check_layer(index: usize) -> Result<usize> {
	ensure!(index < 3, "index out of range");
	Ok(index * 2)
}

#[context(move, "consuming {} values", count)]
fn consume(values: Vec<u8>, count: usize) -> Result<usize> {
	if values.is_empty() {
		bail!("nothing to consume");
	}
	let owned = values;
	Ok(owned.len() + count)
}

#[test]
fn passes_through_ok_values() {
	assert_eq!(parse_number("42").unwrap(), 42);
	assert_eq!(check_layer(2).unwrap(), 4);
	assert_eq!(consume(vec![1, 2], 1).unwrap(), 3);
}

#[test]
fn wraps_errors_with_message() {
	let err = parse_number("x").unwrap_err();
	assert_eq!(err.to_string(), "parsing 'x'");
	assert_eq!(err.root_cause().to_string(), "invalid digit found in string");

	let err = check_layer(7).unwrap_err();
	assert_eq!(format!("{err:#}"), "checking layer 7: index out of range");

	let err = consume(vec![], 5).unwrap_err();
	assert_eq!(format!("{err:#}"), "consuming 5 values: nothing to consume");
}
