use crate::Error;
use crate::registry::{Descriptor, Handler, Invocation};
use crate::signature::{Bindings, Kind, Parameter};
use crate::value::Value;

pub fn descriptors() -> Vec<Descriptor> {
    vec![
        binary(&["add", "sum"], "Adds two numbers and returns the result.", add),
        binary(&["sub"], "Subtracts two numbers and returns the result.", sub),
        binary(&["mul"], "Multiplies two numbers and returns the result.", mul),
        binary(
            &["div"],
            "Divides two numbers, rounding down, and returns the result.",
            div,
        ),
        binary(
            &["mod"],
            "Calculates the modulo of two numbers and returns the result.",
            modulo,
        ),
    ]
}

fn binary(aliases: &[&str], doc: &str, handler: Handler) -> Descriptor {
    Descriptor::new(aliases, handler)
        .doc(&format!("{doc}\n\n:param a: First number.\n:param b: Second number."))
        .param(Parameter::required("a", &[Kind::Number]))
        .param(Parameter::required("b", &[Kind::Number]))
}

fn operands(bindings: &Bindings) -> Result<(&Value, &Value), Error> {
    Ok((bindings.value("a")?, bindings.value("b")?))
}

fn add(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let (a, b) = operands(bindings)?;
    Ok(Some(a.add(b)?))
}

fn sub(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let (a, b) = operands(bindings)?;
    Ok(Some(a.sub(b)?))
}

fn mul(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let (a, b) = operands(bindings)?;
    Ok(Some(a.mul(b)?))
}

fn div(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let (a, b) = operands(bindings)?;
    Ok(Some(a.div(b)?))
}

fn modulo(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let (a, b) = operands(bindings)?;
    Ok(Some(a.rem(b)?))
}
