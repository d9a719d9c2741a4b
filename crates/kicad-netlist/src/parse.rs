use crate::{Component, LoadError, Result};
use roxmltree::{Document, Node};

/// Walks an `export/components/comp` tree and builds components in document order
pub struct Parser<F> {
    tick: F,
}

impl<F: FnMut()> Parser<F> {
    pub fn new(tick: F) -> Self {
        Self { tick }
    }

    pub fn parse_document(&mut self, doc: &Document) -> Result<Vec<Component>> {
        let root = doc.root_element();

        if root.tag_name().name() != "export" {
            log::warn!(
                "Expected root element 'export', found '{}'; no components loaded",
                root.tag_name().name()
            );
            return Ok(Vec::new());
        }

        let sections: Vec<Node> = elements(root, "components").collect();
        if sections.is_empty() {
            log::warn!("Export has no <components> section; no components loaded");
            return Ok(Vec::new());
        }

        let mut components = Vec::new();
        for section in sections {
            for comp in elements(section, "comp") {
                let component = self.parse_comp(&comp)?;
                log::debug!("Loaded component {component}");
                components.push(component);
                (self.tick)();
            }
        }

        Ok(components)
    }

    fn parse_comp(&self, node: &Node) -> Result<Component> {
        let reference = node.attribute("ref").unwrap_or_default();

        let value = child_element(node, "value").ok_or_else(|| LoadError::MalformedRecord {
            reference: reference.to_string(),
        })?;
        let mut component = Component::new(reference, element_text(&value));

        if let Some(footprint) = child_element(node, "footprint") {
            component.set_footprint(element_text(&footprint));
        }
        if let Some(datasheet) = child_element(node, "datasheet") {
            component.set_datasheet(element_text(&datasheet));
        }

        for fields in elements(*node, "fields") {
            for field in elements(fields, "field") {
                let name = field.attribute("name").unwrap_or_default();
                component.insert_field(name.to_string(), element_text(&field));
            }
        }

        Ok(component)
    }
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child_element<'a, 'input: 'a>(
    node: &Node<'a, 'input>,
    name: &'static str,
) -> Option<Node<'a, 'input>> {
    elements(*node, name).next()
}

fn element_text(node: &Node) -> String {
    node.text().unwrap_or_default().to_string()
}
