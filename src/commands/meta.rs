use tracing::warn;

use crate::Error;
use crate::chat::report;
use crate::parser::parse;
use crate::registry::{Descriptor, Invocation};
use crate::signature::{Bindings, Kind, Parameter};
use crate::value::Value;

pub fn descriptors() -> Vec<Descriptor> {
    vec![
        Descriptor::new(&["ass"], ass)
            .doc(
                "ASS - Activate Strict Syntax.\n\n\
                 Execute the command line in the payload and print either its \
                 result or the error it failed with.\n\n\
                 :param payload: The command line for another command.",
            )
            .param(Parameter::required("payload", &[Kind::String])),
        Descriptor::new(&["parse"], parse_line)
            .doc(
                "Parses the command line in the payload and returns its \
                 canonical form.\n\n\
                 :param payload: The command line for another command.",
            )
            .param(Parameter::required("payload", &[Kind::String])),
        Descriptor::new(&["print"], print)
            .doc(
                "Execute the command line in the payload and print the result.\n\n\
                 :param payload: The command line for another command.",
            )
            .param(Parameter::required("payload", &[Kind::String])),
        Descriptor::new(&["help", "halp", "хелп", "халп"], help)
            .doc(
                "Print the documentation for a command, or list all commands \
                 if absent.\n\n\
                 :param name: (Optional) Name of the command that you need help with.",
            )
            .param(Parameter::optional("name", &[Kind::Identifier])),
    ]
}

fn ass(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let line = bindings.text("payload")?;
    match invocation.run_line(line) {
        Ok(Value::Null) => {}
        Ok(result) => invocation.respond(&format!("Command result: {result}")),
        Err(e) => {
            warn!(line = %line, error = %e, "nested command failed");
            invocation.respond(&report(&e));
        }
    }
    Ok(None)
}

fn parse_line(_: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let command = parse(bindings.text("payload")?)?;
    Ok(Some(Value::String(command.to_string())))
}

fn print(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let result = invocation.run_line(bindings.text("payload")?)?;
    invocation.respond(&result.to_string());
    Ok(None)
}

fn help(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let message = match bindings.optional("name") {
        Some(name) => {
            let name = name.to_string();
            match invocation.registry.find_command(&name) {
                Some(descriptor) => descriptor.help().format(),
                None => format!("Unknown command `{name}`"),
            }
        }
        None => {
            let commands: Vec<String> = invocation
                .registry
                .descriptors()
                .map(|d| format!(" - {}", d.aliases().join(", ")))
                .collect();
            format!(
                "Announcer has the following commands:\n{}",
                commands.join("\n")
            )
        }
    };
    invocation.respond(&format!("```{message}```"));
    Ok(None)
}
