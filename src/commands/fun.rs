use rand::seq::IndexedRandom;

use crate::Error;
use crate::registry::{Descriptor, Invocation};
use crate::signature::{Bindings, Kind, Parameter};
use crate::value::Value;

const APRICOT_MEMES: [&str; 3] = [
    "https://memegenerator.net/img/instances/78370751.jpg",
    "https://i.imgflip.com/1zcw47.jpg",
    "https://www.memecreator.org/static/images/memes/4835791.jpg",
];

pub fn descriptors() -> Vec<Descriptor> {
    vec![
        Descriptor::new(&["dumb", "мамкамуипрасе", "dumbdumb"], dumb)
            .doc(
                "Fiercely insult another person and/or inanimate object.\n\n\
                 :param who: The entity that should be insulted.\n\
                 :param howdumb: (Optional) How dumb said entity is.",
            )
            .param(Parameter::required("who", &[Kind::Identifier, Kind::String]))
            .param(Parameter::optional(
                "howdumb",
                &[Kind::Identifier, Kind::String],
            )),
        Descriptor::new(&["apricot", "кайсий", "кайсии"], apricot)
            .doc("Call upon the god of apricots to bring forth an apricot meme."),
    ]
}

fn dumb(invocation: &mut Invocation<'_>, bindings: &Bindings) -> Result<Option<Value>, Error> {
    let who = bindings.text("who")?;
    let message = match bindings.optional("howdumb").and_then(Value::as_str) {
        Some(howdumb) => format!("{who} is {howdumb} dumb"),
        None => format!("{who} is dumb"),
    };
    invocation.respond(&message);
    Ok(None)
}

fn apricot(invocation: &mut Invocation<'_>, _: &Bindings) -> Result<Option<Value>, Error> {
    if let Some(meme) = APRICOT_MEMES.choose(&mut rand::rng()) {
        invocation.respond(meme);
    }
    Ok(None)
}
