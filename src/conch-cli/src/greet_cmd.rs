//! The `greet` default command.

use conch_dispatch::prelude::*;

/// Build the `greet` command: a small end-to-end exercise of ordinals,
/// defaults, and quoting.
pub fn command() -> Result<Command, CommandError> {
    let name = Parameter::new("name", TypeDesc::string(), "Who to greet.")?.with_ordinal(1)?;
    let times = Parameter::new(
        "times",
        TypeDesc::Primitive(Primitive::Int),
        "How many times to repeat the greeting.",
    )?
    .with_ordinal(2)?
    .with_default(Value::Int(1))?;

    Command::builder("greet", "Print a greeting.")
        .param(name)
        .param(times)
        .action(|_, values, sink| {
            let name = values.text("name").unwrap_or("");
            let times = values.int("times").unwrap_or(1).max(0);
            for _ in 0..times {
                sink.write_line(&format!("Hello, {name}!"));
            }
            true
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conch_dispatch::builtin;

    #[test]
    fn test_greet_repeats() {
        let mut registry = CommandRegistry::new();
        builtin::register_builtins(&mut registry);
        registry.register(command().unwrap());

        let converter = Converter::new();
        let resolver = Resolver::new(&registry, &converter);
        let invocation = resolver.resolve_line("greet \"Ada Lovelace\" 2").unwrap();

        let mut sink: Vec<String> = Vec::new();
        assert!(invocation.execute(&registry, &mut sink).success);
        assert_eq!(sink, vec!["Hello, Ada Lovelace!", "Hello, Ada Lovelace!"]);
    }
}
