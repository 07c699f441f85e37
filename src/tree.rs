use std::ops::ControlFlow;

use serde_json::{Map, Number, Value};

use crate::number;
use crate::reader::JsonhReader;
use crate::token::{JsonhToken, TokenKind};
use crate::{Error, Result};

/// Folds the token stream of one element into a generic JSON value.
pub(crate) fn parse_element(reader: &mut JsonhReader<'_>) -> Result<Value> {
    let mut builder = TreeBuilder::default();
    let outcome = reader.read_element_into(&mut |token| builder.accept(token));
    if let Some(error) = builder.error.take() {
        return Err(error);
    }
    outcome?;

    let root = builder
        .root
        .take()
        .ok_or_else(|| Error::lexical("Expected token, got end of input"))?;

    if reader.options().parse_single_element {
        reader.read_end_of_elements(&mut |_token| ControlFlow::Continue(()))?;
    }

    Ok(root)
}

/// Assembles a value from tokens by stacking partially built containers,
/// with a single pending property name slot.
#[derive(Default)]
struct TreeBuilder {
    /// Open containers, each with the property name that will place it in
    /// its parent.
    stack: Vec<(Option<String>, Value)>,
    pending_name: Option<String>,
    root: Option<Value>,
    error: Option<Error>,
}

impl TreeBuilder {
    fn accept(&mut self, token: JsonhToken) -> ControlFlow<()> {
        match token.kind {
            TokenKind::Comment | TokenKind::None => ControlFlow::Continue(()),
            TokenKind::Null => self.submit(Value::Null),
            TokenKind::TrueBool => self.submit(Value::Bool(true)),
            TokenKind::FalseBool => self.submit(Value::Bool(false)),
            TokenKind::String => self.submit(Value::String(token.value.into())),
            TokenKind::Number => match number_value(&token.value) {
                Ok(value) => self.submit(value),
                Err(error) => self.fail(error),
            },
            TokenKind::PropertyName => {
                self.pending_name = Some(token.value.into());
                ControlFlow::Continue(())
            }
            TokenKind::StartObject => self.start(Value::Object(Map::new())),
            TokenKind::StartArray => self.start(Value::Array(Vec::new())),
            TokenKind::EndObject | TokenKind::EndArray => self.end(),
        }
    }

    fn start(&mut self, container: Value) -> ControlFlow<()> {
        let name = self.pending_name.take();
        self.stack.push((name, container));
        ControlFlow::Continue(())
    }

    fn end(&mut self) -> ControlFlow<()> {
        match self.stack.pop() {
            Some((name, container)) => self.place(name, container),
            None => self.fail(Error::structural("Unexpected end of container")),
        }
    }

    fn submit(&mut self, value: Value) -> ControlFlow<()> {
        let name = self.pending_name.take();
        self.place(name, value)
    }

    fn place(&mut self, name: Option<String>, value: Value) -> ControlFlow<()> {
        match self.stack.last_mut() {
            // The root element is complete
            None => {
                self.root = Some(value);
                ControlFlow::Break(())
            }
            Some((_, Value::Array(items))) => {
                items.push(value);
                ControlFlow::Continue(())
            }
            Some((_, Value::Object(properties))) => match name {
                Some(name) => {
                    properties.insert(name, value);
                    ControlFlow::Continue(())
                }
                None => self.fail(Error::structural("Expected property name before value")),
            },
            Some(_) => self.fail(Error::structural("Value submitted outside a container")),
        }
    }

    fn fail(&mut self, error: Error) -> ControlFlow<()> {
        self.error = Some(error);
        ControlFlow::Break(())
    }
}

/// Converts number token text to a JSON number, keeping an integer
/// representation for integral values.
fn number_value(text: &str) -> Result<Value> {
    let parsed = number::parse(text)?;

    if parsed.fract() == 0.0 {
        if parsed >= 0.0 {
            let integer = parsed as u64;
            if integer as f64 == parsed {
                return Ok(Value::Number(Number::from(integer)));
            }
        } else {
            let integer = parsed as i64;
            if integer as f64 == parsed {
                return Ok(Value::Number(Number::from(integer)));
            }
        }
    }

    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| Error::semantic("Failed to convert number to JSON number"))
}
