//! RDF/XML rendering of one profile document.
//!
//! Owned instances are written with `rdf:ID`, about entries with
//! `rdf:about="#..."`. Reference values become self-closing elements with an
//! `rdf:resource`; literal values are wrapped in an open/close element.

use super::namespaces::Namespaces;
use super::partition::ExportEntry;
use super::references::RecordValue;
use anyhow::Result;
use cgmes_core::CgmesProfile;
use chrono::NaiveDateTime;
use quick_xml::escape::escape;
use std::fmt::Write;

/// `created` timestamp layout in the model header.
pub const CREATED_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Value of a model header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Literal(String),
    /// Rendered without the `#` prefix.
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub value: HeaderValue,
}

impl HeaderField {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: HeaderValue::Literal(value.into()),
        }
    }

    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: HeaderValue::Reference(target.into()),
        }
    }
}

/// `md:FullModel` description block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHeader {
    pub mrid: String,
    pub description: Vec<HeaderField>,
}

impl ModelHeader {
    pub fn new(
        mrid: impl Into<String>,
        created: NaiveDateTime,
        modeling_authority: &str,
        profile: CgmesProfile,
    ) -> Self {
        Self {
            mrid: mrid.into(),
            description: vec![
                HeaderField::literal("created", created.format(CREATED_FORMAT).to_string()),
                HeaderField::literal("modelingAuthoritySet", modeling_authority),
                HeaderField::literal("profile", profile.full_name()),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&HeaderValue> {
        self.description
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}

/// Everything needed to render one profile.
#[derive(Debug, Clone)]
pub struct ProfileDocument<'a> {
    pub profile: CgmesProfile,
    pub namespaces: &'a Namespaces,
    pub model: ModelHeader,
    pub classes: &'a [ExportEntry],
    pub about: &'a [ExportEntry],
}

/// Turns a profile document into text.
pub trait ProfileRenderer {
    fn render(&self, document: &ProfileDocument<'_>) -> Result<String>;
}

/// Default CGMES RDF/XML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfXmlRenderer;

impl ProfileRenderer for RdfXmlRenderer {
    fn render(&self, document: &ProfileDocument<'_>) -> Result<String> {
        render_profile(document)
    }
}

pub fn render_profile(document: &ProfileDocument<'_>) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    write!(out, "<rdf:RDF")?;
    for (prefix, uri) in document.namespaces.iter() {
        write!(out, " xmlns:{}=\"{}\"", prefix, escape(uri))?;
    }
    writeln!(out, ">")?;

    write_model_header(&mut out, &document.model)?;

    for entry in document.classes {
        writeln!(
            out,
            "  <cim:{} rdf:ID=\"{}\">",
            entry.name,
            escape(entry.mrid.as_str())
        )?;
        write_attributes(&mut out, entry)?;
        writeln!(out, "  </cim:{}>", entry.name)?;
    }

    for entry in document.about {
        writeln!(
            out,
            "  <cim:{} rdf:about=\"#{}\">",
            entry.name,
            escape(entry.mrid.as_str())
        )?;
        write_attributes(&mut out, entry)?;
        writeln!(out, "  </cim:{}>", entry.name)?;
    }

    writeln!(out, "</rdf:RDF>")?;
    Ok(out)
}

fn write_model_header(out: &mut String, model: &ModelHeader) -> Result<()> {
    writeln!(out, "  <md:FullModel rdf:about=\"{}\">", escape(model.mrid.as_str()))?;
    for field in &model.description {
        match &field.value {
            HeaderValue::Literal(value) => writeln!(
                out,
                "    <md:Model.{name}>{value}</md:Model.{name}>",
                name = field.name,
                value = escape(value.as_str())
            )?,
            HeaderValue::Reference(target) => writeln!(
                out,
                "    <md:Model.{} rdf:resource=\"{}\"/>",
                field.name,
                escape(target.as_str())
            )?,
        }
    }
    writeln!(out, "  </md:FullModel>")?;
    Ok(())
}

fn write_attributes(out: &mut String, entry: &ExportEntry) -> Result<()> {
    for record in &entry.attributes {
        let tag = record.qualified_name();
        match &record.value {
            RecordValue::Literal(literal) => writeln!(
                out,
                "    <cim:{tag}>{value}</cim:{tag}>",
                tag = tag,
                value = escape(literal.to_string().as_str())
            )?,
            RecordValue::Reference(target) => write_reference(out, &tag, target)?,
            RecordValue::References(targets) => {
                for target in targets {
                    write_reference(out, &tag, target)?;
                }
            }
        }
    }
    Ok(())
}

fn write_reference(out: &mut String, tag: &str, target: &str) -> Result<()> {
    writeln!(out, "    <cim:{} rdf:resource=\"#{}\"/>", tag, escape(target))?;
    Ok(())
}
