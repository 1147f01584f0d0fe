use super::{CompileError, MissingRouteParameterError, ValidationError};

/// Replace every `{name}` placeholder in `template` with the value returned by `lookup`.
///
/// Values are inserted as they are: callers must percent-encode them.
pub(crate) fn substitute<'v>(
    template: &str,
    mut lookup: impl FnMut(&str) -> Option<&'v str>,
) -> Result<String, CompileError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(ValidationError::unclosed_placeholder(template).into());
        };
        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| MissingRouteParameterError {
            parameter: name.to_owned(),
            template: template.to_owned(),
        })?;
        rendered.push_str(value);
        rest = &after[end + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}
