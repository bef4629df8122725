//! MAML XML writer — serializes the document model with the fixed
//! namespace-prefix table and element ordering of the help-content schema.
//!
//! Booleans render as the literal tokens `true`/`false`; the pipeline-input
//! attribute uses the closed vocabulary from
//! [`PipelineInput::as_maml`](crate::model::PipelineInput::as_maml).

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::GenError;
use crate::model::{Command, CommandExample, CommandValue, HelpItems, Parameter, SyntaxItem};

/// Default namespace of the `helpItems` wrapper.
pub const NS_ROOT: &str = "http://msh";
/// Namespace for narrative elements, prefix `maml`.
pub const NS_MAML: &str = "http://schemas.microsoft.com/maml/2004/10";
/// Namespace for developer metadata, prefix `dev`.
pub const NS_DEV: &str = "http://schemas.microsoft.com/maml/dev/2004/10";
/// Namespace for command-structure elements, prefix `command`.
pub const NS_COMMAND: &str = "http://schemas.microsoft.com/maml/dev/command/2004/10";

/// Serialize a whole help document.
pub fn render_help(help: &HelpItems) -> Result<String, GenError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("helpItems");
    root.push_attribute(("xmlns", NS_ROOT));
    root.push_attribute(("xmlns:maml", NS_MAML));
    root.push_attribute(("xmlns:dev", NS_DEV));
    root.push_attribute(("xmlns:command", NS_COMMAND));
    root.push_attribute(("schema", help.schema.as_str()));
    writer.write_event(Event::Start(root))?;
    for command in &help.commands {
        write_command(&mut writer, command, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new("helpItems")))?;

    Ok(finish(writer))
}

/// Serialize a single command, with the namespace declarations on its root
/// element.
pub fn render_command(command: &Command) -> Result<String, GenError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_command(&mut writer, command, true)?;
    Ok(finish(writer))
}

fn finish(writer: Writer<Cursor<Vec<u8>>>) -> String {
    let bytes = writer.into_inner().into_inner();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn write_command<W: Write>(
    w: &mut Writer<W>,
    command: &Command,
    with_namespaces: bool,
) -> Result<(), GenError> {
    let mut start = BytesStart::new("command:command");
    if with_namespaces {
        start.push_attribute(("xmlns:maml", NS_MAML));
        start.push_attribute(("xmlns:dev", NS_DEV));
        start.push_attribute(("xmlns:command", NS_COMMAND));
    }
    w.write_event(Event::Start(start))?;

    w.write_event(Event::Start(BytesStart::new("command:details")))?;
    write_text_element(w, "command:name", &command.details.name)?;
    write_paragraph_block(w, "maml:description", &command.details.synopsis)?;
    write_text_element(w, "command:verb", &command.details.verb)?;
    write_text_element(w, "command:noun", &command.details.noun)?;
    w.write_event(Event::End(BytesEnd::new("command:details")))?;

    write_paragraph_block(w, "maml:description", &command.description)?;

    if command.syntax.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("command:syntax")))?;
    } else {
        w.write_event(Event::Start(BytesStart::new("command:syntax")))?;
        for item in &command.syntax {
            write_syntax_item(w, item)?;
        }
        w.write_event(Event::End(BytesEnd::new("command:syntax")))?;
    }

    if command.parameters.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("command:parameters")))?;
    } else {
        w.write_event(Event::Start(BytesStart::new("command:parameters")))?;
        for parameter in &command.parameters {
            write_parameter(w, parameter)?;
        }
        w.write_event(Event::End(BytesEnd::new("command:parameters")))?;
    }

    write_values(w, "command:inputTypes", "command:inputType", &command.input_types)?;
    write_values(
        w,
        "command:returnValues",
        "command:returnValue",
        &command.return_values,
    )?;

    if command.examples.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("command:examples")))?;
    } else {
        w.write_event(Event::Start(BytesStart::new("command:examples")))?;
        for example in &command.examples {
            write_example(w, example)?;
        }
        w.write_event(Event::End(BytesEnd::new("command:examples")))?;
    }

    w.write_event(Event::End(BytesEnd::new("command:command")))?;
    Ok(())
}

fn write_syntax_item<W: Write>(w: &mut Writer<W>, item: &SyntaxItem) -> Result<(), GenError> {
    w.write_event(Event::Start(BytesStart::new("command:syntaxItem")))?;
    write_text_element(w, "maml:name", &item.command_name)?;
    for parameter in &item.parameters {
        write_parameter(w, parameter)?;
    }
    w.write_event(Event::End(BytesEnd::new("command:syntaxItem")))?;
    Ok(())
}

fn write_parameter<W: Write>(w: &mut Writer<W>, parameter: &Parameter) -> Result<(), GenError> {
    let mut start = BytesStart::new("command:parameter");
    start.push_attribute(("required", bool_str(parameter.is_mandatory)));
    start.push_attribute(("variableLength", bool_str(parameter.is_variable_length)));
    start.push_attribute(("globbing", bool_str(parameter.supports_globbing)));
    start.push_attribute(("pipelineInput", parameter.pipeline_input.as_maml()));
    start.push_attribute(("position", parameter.position.as_str()));
    start.push_attribute(("aliases", parameter.aliases.as_str()));
    w.write_event(Event::Start(start))?;

    write_text_element(w, "maml:name", &parameter.name)?;
    write_paragraph_block(w, "maml:description", &parameter.description)?;

    let mut value = BytesStart::new("command:parameterValue");
    value.push_attribute(("required", bool_str(parameter.value.is_mandatory)));
    value.push_attribute(("variableLength", bool_str(parameter.value.is_variable_length)));
    if parameter.value.data_type.is_empty() {
        w.write_event(Event::Empty(value))?;
    } else {
        w.write_event(Event::Start(value))?;
        w.write_event(Event::Text(BytesText::new(&parameter.value.data_type)))?;
        w.write_event(Event::End(BytesEnd::new("command:parameterValue")))?;
    }

    write_text_element(w, "dev:defaultValue", &parameter.default_value)?;
    w.write_event(Event::End(BytesEnd::new("command:parameter")))?;
    Ok(())
}

fn write_example<W: Write>(w: &mut Writer<W>, example: &CommandExample) -> Result<(), GenError> {
    w.write_event(Event::Start(BytesStart::new("command:example")))?;
    write_text_element(w, "maml:title", &example.title)?;
    write_paragraph_block(w, "maml:introduction", &example.description)?;
    write_text_element(w, "dev:code", &example.code)?;
    write_paragraph_block(w, "dev:remarks", &example.remarks)?;
    w.write_event(Event::End(BytesEnd::new("command:example")))?;
    Ok(())
}

fn write_values<W: Write>(
    w: &mut Writer<W>,
    list_name: &str,
    item_name: &str,
    values: &[CommandValue],
) -> Result<(), GenError> {
    if values.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(list_name)))?;
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(list_name)))?;
    for value in values {
        w.write_event(Event::Start(BytesStart::new(item_name)))?;
        w.write_event(Event::Start(BytesStart::new("dev:type")))?;
        write_text_element(w, "maml:name", &value.data_type.name)?;
        if let Some(uri) = &value.data_type.uri {
            write_text_element(w, "maml:uri", uri)?;
        }
        write_paragraph_block(w, "maml:description", &value.data_type.description)?;
        w.write_event(Event::End(BytesEnd::new("dev:type")))?;
        write_paragraph_block(w, "maml:description", &value.description)?;
        w.write_event(Event::End(BytesEnd::new(item_name)))?;
    }
    w.write_event(Event::End(BytesEnd::new(list_name)))?;
    Ok(())
}

/// A paragraph container: one `maml:para` per entry; an empty list or an
/// empty paragraph collapses to an empty element.
fn write_paragraph_block<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    paragraphs: &[String],
) -> Result<(), GenError> {
    if paragraphs.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(name)))?;
    for paragraph in paragraphs {
        write_text_element(w, "maml:para", paragraph)?;
    }
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<(), GenError> {
    if text.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommandDetails, DataType, ParameterValue, PipelineInput};
    use std::sync::Arc;

    fn foo_bar_command() -> Command {
        let name_parameter = Arc::new(Parameter {
            name: "Name".to_string(),
            description: vec!["The bar name".to_string()],
            value: ParameterValue {
                data_type: "String".to_string(),
                is_mandatory: true,
                is_variable_length: false,
            },
            is_mandatory: true,
            pipeline_input: PipelineInput::BY_VALUE,
            position: "0".to_string(),
            ..Parameter::default()
        });

        Command {
            details: CommandDetails {
                name: "Get-FooBar".to_string(),
                synopsis: vec!["Retrieve one or more FooBars.".to_string()],
                verb: "Get".to_string(),
                noun: "FooBar".to_string(),
            },
            description: vec![
                "This command works with FooBars.".to_string(),
                "It gets them.".to_string(),
            ],
            syntax: vec![SyntaxItem {
                command_name: "Get-FooBar".to_string(),
                parameters: vec![Arc::clone(&name_parameter)],
            }],
            parameters: vec![name_parameter],
            ..Command::default()
        }
    }

    #[test]
    fn command_renders_with_namespaces_and_ordering() {
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<command:command xmlns:maml="http://schemas.microsoft.com/maml/2004/10" xmlns:dev="http://schemas.microsoft.com/maml/dev/2004/10" xmlns:command="http://schemas.microsoft.com/maml/dev/command/2004/10">
  <command:details>
    <command:name>Get-FooBar</command:name>
    <maml:description>
      <maml:para>Retrieve one or more FooBars.</maml:para>
    </maml:description>
    <command:verb>Get</command:verb>
    <command:noun>FooBar</command:noun>
  </command:details>
  <maml:description>
    <maml:para>This command works with FooBars.</maml:para>
    <maml:para>It gets them.</maml:para>
  </maml:description>
  <command:syntax>
    <command:syntaxItem>
      <maml:name>Get-FooBar</maml:name>
      <command:parameter required="true" variableLength="true" globbing="false" pipelineInput="true (ByValue)" position="0" aliases="none">
        <maml:name>Name</maml:name>
        <maml:description>
          <maml:para>The bar name</maml:para>
        </maml:description>
        <command:parameterValue required="true" variableLength="false">String</command:parameterValue>
        <dev:defaultValue>None</dev:defaultValue>
      </command:parameter>
    </command:syntaxItem>
  </command:syntax>
  <command:parameters>
    <command:parameter required="true" variableLength="true" globbing="false" pipelineInput="true (ByValue)" position="0" aliases="none">
      <maml:name>Name</maml:name>
      <maml:description>
        <maml:para>The bar name</maml:para>
      </maml:description>
      <command:parameterValue required="true" variableLength="false">String</command:parameterValue>
      <dev:defaultValue>None</dev:defaultValue>
    </command:parameter>
  </command:parameters>
  <command:inputTypes/>
  <command:returnValues/>
  <command:examples/>
</command:command>"#;

        let actual = render_command(&foo_bar_command()).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn help_items_root_carries_namespace_table_and_schema() {
        let help = HelpItems {
            commands: vec![foo_bar_command()],
            ..HelpItems::default()
        };
        let xml = render_help(&help).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<helpItems "));
        assert!(xml.contains("xmlns=\"http://msh\""));
        assert!(xml.contains("xmlns:maml=\"http://schemas.microsoft.com/maml/2004/10\""));
        assert!(xml.contains("schema=\"maml\""));
        assert!(xml.ends_with("</helpItems>"));
    }

    #[test]
    fn example_renders_title_introduction_code_remarks() {
        let mut command = foo_bar_command();
        command.examples = vec![CommandExample {
            title: "Example 1".to_string(),
            description: vec!["Fetch a bar.".to_string()],
            code: "Get-FooBar -Name bar".to_string(),
            remarks: vec!["Bars arrive on the pipeline.".to_string()],
        }];
        let xml = render_command(&command).unwrap();
        assert!(xml.contains("<maml:title>Example 1</maml:title>"));
        assert!(xml.contains("<maml:introduction>"));
        assert!(xml.contains("<dev:code>Get-FooBar -Name bar</dev:code>"));
        assert!(xml.contains("<dev:remarks>"));
    }

    #[test]
    fn return_value_renders_type_with_uri() {
        let mut command = foo_bar_command();
        command.return_values = vec![CommandValue {
            data_type: DataType {
                name: "FooBar".to_string(),
                uri: Some("https://example.com/foobar".to_string()),
                description: vec!["A bar of foo.".to_string()],
            },
            description: vec!["One per match.".to_string()],
        }];
        let xml = render_command(&command).unwrap();
        assert!(xml.contains("<command:returnValue>"));
        assert!(xml.contains("<maml:name>FooBar</maml:name>"));
        assert!(xml.contains("<maml:uri>https://example.com/foobar</maml:uri>"));
        assert!(xml.contains("<maml:para>One per match.</maml:para>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut command = foo_bar_command();
        command.details.synopsis = vec!["Bars & <foos>".to_string()];
        let xml = render_command(&command).unwrap();
        assert!(xml.contains("Bars &amp; &lt;foos&gt;"));
    }

    #[test]
    fn empty_collections_render_as_empty_elements() {
        let command = Command {
            details: CommandDetails {
                name: "Get-Nothing".to_string(),
                ..CommandDetails::default()
            },
            ..Command::default()
        };
        let xml = render_command(&command).unwrap();
        assert!(xml.contains("<command:syntax/>"));
        assert!(xml.contains("<command:parameters/>"));
        assert!(xml.contains("<command:inputTypes/>"));
        assert!(xml.contains("<command:returnValues/>"));
        assert!(xml.contains("<command:examples/>"));
    }
}
