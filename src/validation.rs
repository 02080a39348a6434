use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Lists the fields of an input in declaration order, so that validation
/// messages come out in the same order the fields were declared.
///
/// Implemented by `#[model]` for generated inputs.
pub trait Fields {
	const FIELDS: &'static [&'static str];
}

/// Maps a constraint kind (the [`ValidationError::code`]) to its message.
///
/// `{field}` is replaced with the field name and `{param}` with the value of
/// the named parameter on the error.
struct Rule {
	code: &'static str,
	param: Option<&'static str>,
	template: &'static str,
}

/// The order of this table decides which message wins when a single field
/// violates more than one constraint.
const RULES: &[Rule] = &[
	Rule {
		code: "required",
		param: None,
		template: "{field} must not be empty",
	},
	Rule {
		code: "length",
		param: Some("min"),
		template: "{field} must be at least {param} characters",
	},
	Rule {
		code: "oneof",
		param: Some("allowed"),
		template: "{field} must be one of: {param}",
	},
	Rule {
		code: "number",
		param: None,
		template: "invalid {field} parameter",
	},
];

const FALLBACK: &str = "{field} failed the {code} constraint";

fn rank(error: &ValidationError) -> usize {
	RULES
		.iter()
		.position(|rule| rule.code == error.code)
		.unwrap_or(RULES.len())
}

fn param(error: &ValidationError, name: &str) -> Option<String> {
	error.params.get(name).map(|value| match value {
		serde_json::Value::String(value) => value.clone(),
		value => value.to_string(),
	})
}

/// Renders a single constraint violation for `field`.
pub fn describe(field: &str, error: &ValidationError) -> String {
	let rule = RULES.iter().find(|rule| rule.code == error.code);

	let rendered = match rule {
		Some(Rule {
			param: Some(name),
			template,
			..
		}) => param(error, name).map(|value| template.replace("{param}", &value)),
		Some(Rule {
			param: None,
			template,
			..
		}) => Some((*template).to_owned()),
		None => None,
	};

	rendered
		.unwrap_or_else(|| FALLBACK.replace("{code}", &error.code))
		.replace("{field}", field)
}

/// Produces one message per invalid field, in the order given by [`Fields`].
///
/// Fields that fail but are not listed are appended in name order.
pub fn messages<T: Fields>(errors: &ValidationErrors) -> Vec<String> {
	let field_errors = errors.field_errors();

	let mut unlisted = field_errors
		.keys()
		.copied()
		.filter(|field| !T::FIELDS.contains(field))
		.collect::<Vec<_>>();
	unlisted.sort_unstable();

	T::FIELDS
		.iter()
		.copied()
		.chain(unlisted)
		.filter_map(|field| {
			let error = field_errors.get(field)?.iter().min_by_key(|error| rank(error))?;

			Some(describe(field, error))
		})
		.collect()
}

/// Fails with `required` on an empty string.
pub fn required(value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::new("required"));
	}

	Ok(())
}

/// Fails with `number` unless the value is a non-negative integer.
pub fn number(value: &str) -> Result<(), ValidationError> {
	value
		.parse::<i64>()
		.ok()
		.filter(|value| *value >= 0)
		.map(|_| ())
		.ok_or_else(|| ValidationError::new("number"))
}

/// Builds a `oneof` error listing the allowed values, separated by spaces.
pub fn one_of(allowed: &[&str]) -> ValidationError {
	let mut error = ValidationError::new("oneof");

	error.add_param(Cow::Borrowed("allowed"), &allowed.join(" "));
	error
}
