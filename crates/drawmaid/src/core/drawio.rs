//! draw.io document builder
//!
//! Collects vertex and edge cells and serialises them with quick-xml into
//! an uncompressed `<mxfile>` document. Cell ids come from a counter owned
//! by the document, so they are unique within one output and independent
//! across calls.

use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{Point, Position};

/// Id of the model root cell
pub const ROOT_CELL: &str = "0";
/// Id of the default layer every cell is parented to
pub const LAYER_CELL: &str = "1";

/// Connector endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeEnds {
    /// Attached to two vertex cells
    Cells { source: String, target: String },
    /// Free-floating between two points
    Points { source: Point, target: Point },
}

#[derive(Debug)]
struct VertexCell {
    id: String,
    value: String,
    style: String,
    parent: String,
    geometry: Position,
}

#[derive(Debug)]
struct EdgeCell {
    id: String,
    value: String,
    style: String,
    ends: EdgeEnds,
    waypoints: Vec<Point>,
}

/// An in-progress draw.io document
#[derive(Debug)]
pub struct DrawioDocument {
    name: String,
    next_id: usize,
    vertices: Vec<VertexCell>,
    edges: Vec<EdgeCell>,
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attributes {
        start.push_attribute((key, value));
    }
    start
}

fn write_point(writer: &mut Writer<Vec<u8>>, point: Point, role: Option<&str>) -> Result<()> {
    let (x, y) = (point.x.to_string(), point.y.to_string());
    let mut attributes = vec![("x", x.as_str()), ("y", y.as_str())];
    if let Some(role) = role {
        attributes.push(("as", role));
    }
    writer.write_event(Event::Empty(element("mxPoint", &attributes)))?;
    Ok(())
}

impl DrawioDocument {
    /// Create an empty document with a page name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: 2,
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Allocate a fresh cell id
    pub fn next_id(&mut self) -> String {
        let id = format!("dm-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a vertex cell and return its id
    pub fn add_vertex(&mut self, value: &str, style: &str, geometry: Position) -> String {
        self.push_vertex(LAYER_CELL, value, style, geometry)
    }

    /// Add a vertex cell nested in another cell; geometry is relative to the parent
    pub fn add_child_vertex(
        &mut self,
        parent: &str,
        value: &str,
        style: &str,
        geometry: Position,
    ) -> String {
        self.push_vertex(parent, value, style, geometry)
    }

    fn push_vertex(
        &mut self,
        parent: &str,
        value: &str,
        style: &str,
        geometry: Position,
    ) -> String {
        let id = self.next_id();
        self.vertices.push(VertexCell {
            id: id.clone(),
            value: value.to_string(),
            style: style.to_string(),
            parent: parent.to_string(),
            geometry,
        });
        id
    }

    /// Add an edge cell and return its id
    pub fn add_edge(
        &mut self,
        value: &str,
        style: &str,
        ends: EdgeEnds,
        waypoints: &[Point],
    ) -> String {
        let id = self.next_id();
        self.edges.push(EdgeCell {
            id: id.clone(),
            value: value.to_string(),
            style: style.to_string(),
            ends,
            waypoints: waypoints.to_vec(),
        });
        id
    }

    /// Number of vertex cells added so far
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edge cells added so far
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn write_vertex(writer: &mut Writer<Vec<u8>>, cell: &VertexCell) -> Result<()> {
        let start = element(
            "mxCell",
            &[
                ("id", cell.id.as_str()),
                ("value", cell.value.as_str()),
                ("style", cell.style.as_str()),
                ("vertex", "1"),
                ("parent", cell.parent.as_str()),
            ],
        );
        writer.write_event(Event::Start(start))?;

        let geometry = cell.geometry;
        let (x, y) = (geometry.x.to_string(), geometry.y.to_string());
        let (width, height) = (geometry.width.to_string(), geometry.height.to_string());
        writer.write_event(Event::Empty(element(
            "mxGeometry",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("as", "geometry"),
            ],
        )))?;

        writer.write_event(Event::End(BytesEnd::new("mxCell")))?;
        Ok(())
    }

    fn write_edge(writer: &mut Writer<Vec<u8>>, cell: &EdgeCell) -> Result<()> {
        let mut attributes = vec![
            ("id", cell.id.as_str()),
            ("value", cell.value.as_str()),
            ("style", cell.style.as_str()),
            ("edge", "1"),
            ("parent", LAYER_CELL),
        ];
        let geometry = match &cell.ends {
            EdgeEnds::Cells { source, target } => {
                attributes.push(("source", source.as_str()));
                attributes.push(("target", target.as_str()));
                element("mxGeometry", &[("relative", "1"), ("as", "geometry")])
            }
            EdgeEnds::Points { .. } => element(
                "mxGeometry",
                &[
                    ("width", "50"),
                    ("height", "50"),
                    ("relative", "1"),
                    ("as", "geometry"),
                ],
            ),
        };
        writer.write_event(Event::Start(element("mxCell", &attributes)))?;
        writer.write_event(Event::Start(geometry))?;

        if let EdgeEnds::Points { source, target } = &cell.ends {
            write_point(writer, *source, Some("sourcePoint"))?;
            write_point(writer, *target, Some("targetPoint"))?;
        }
        if !cell.waypoints.is_empty() {
            writer.write_event(Event::Start(element("Array", &[("as", "points")])))?;
            for point in &cell.waypoints {
                write_point(writer, *point, None)?;
            }
            writer.write_event(Event::End(BytesEnd::new("Array")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("mxGeometry")))?;
        writer.write_event(Event::End(BytesEnd::new("mxCell")))?;
        Ok(())
    }

    /// Serialise the document
    ///
    /// Cells are written as the two root cells, then vertices, then edges.
    pub fn finish(self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let agent = format!("drawmaid {}", env!("CARGO_PKG_VERSION"));

        writer.write_event(Event::Start(element(
            "mxfile",
            &[("host", "drawmaid"), ("agent", agent.as_str()), ("type", "device")],
        )))?;
        writer.write_event(Event::Start(element(
            "diagram",
            &[("id", "drawmaid-page"), ("name", self.name.as_str())],
        )))?;
        writer.write_event(Event::Start(element(
            "mxGraphModel",
            &[
                ("dx", "1200"),
                ("dy", "800"),
                ("grid", "1"),
                ("gridSize", "10"),
                ("guides", "1"),
                ("tooltips", "1"),
                ("connect", "1"),
                ("arrows", "1"),
                ("fold", "1"),
                ("page", "1"),
                ("pageScale", "1"),
                ("pageWidth", "850"),
                ("pageHeight", "1100"),
                ("math", "0"),
                ("shadow", "0"),
            ],
        )))?;
        writer.write_event(Event::Start(BytesStart::new("root")))?;
        writer.write_event(Event::Empty(element("mxCell", &[("id", ROOT_CELL)])))?;
        writer.write_event(Event::Empty(element(
            "mxCell",
            &[("id", LAYER_CELL), ("parent", ROOT_CELL)],
        )))?;

        for cell in &self.vertices {
            Self::write_vertex(&mut writer, cell)?;
        }
        for cell in &self.edges {
            Self::write_edge(&mut writer, cell)?;
        }

        for name in ["root", "mxGraphModel", "diagram", "mxfile"] {
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_skip_root_cells() {
        let mut doc = DrawioDocument::new("page");
        let a = doc.add_vertex("A", "rounded=0;", Position::new(0, 0, 10, 10));
        let b = doc.add_vertex("B", "rounded=0;", Position::new(0, 0, 10, 10));
        assert_ne!(a, b);
        assert_ne!(a, ROOT_CELL);
        assert_ne!(a, LAYER_CELL);
    }

    #[test]
    fn test_root_cells_are_written_first() {
        let xml = DrawioDocument::new("page").finish().unwrap();
        assert!(xml.starts_with("<mxfile host=\"drawmaid\""));
        let root = xml.find("<mxCell id=\"0\"/>").unwrap();
        let layer = xml.find("<mxCell id=\"1\" parent=\"0\"/>").unwrap();
        assert!(root < layer);
        assert!(xml.ends_with("</mxfile>\n"));
    }

    #[test]
    fn test_vertices_precede_edges() {
        let mut doc = DrawioDocument::new("page");
        let a = doc.add_vertex("A", "", Position::new(0, 0, 10, 10));
        let b = doc.add_vertex("B", "", Position::new(0, 50, 10, 10));
        doc.add_edge(
            "go",
            "endArrow=classic;",
            EdgeEnds::Cells {
                source: a.clone(),
                target: b.clone(),
            },
            &[Point::new(20, 20)],
        );
        let late = doc.add_vertex("C", "", Position::new(0, 100, 10, 10));
        assert_eq!(doc.vertex_count(), 3);
        assert_eq!(doc.edge_count(), 1);

        let xml = doc.finish().unwrap();
        let edge_at = xml.find("edge=\"1\"").unwrap();
        let late_at = xml.find(&format!("id=\"{}\"", late)).unwrap();
        assert!(late_at < edge_at);
        let array_at = xml.find("<Array as=\"points\">").unwrap();
        assert!(xml[array_at..].contains("<mxPoint x=\"20\" y=\"20\"/>"));
        assert!(xml.contains(&format!("source=\"{}\" target=\"{}\"", a, b)));
    }

    #[test]
    fn test_free_edge_uses_points() {
        let mut doc = DrawioDocument::new("page");
        doc.add_edge(
            "hello",
            "",
            EdgeEnds::Points {
                source: Point::new(10, 20),
                target: Point::new(210, 20),
            },
            &[],
        );
        let xml = doc.finish().unwrap();
        assert!(xml.contains("as=\"sourcePoint\""));
        assert!(xml.contains("x=\"210\" y=\"20\" as=\"targetPoint\""));
        assert!(!xml.contains("<Array"));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut doc = DrawioDocument::new("a & b");
        doc.add_vertex("x < y", "", Position::default());
        doc.add_vertex("say \"hi\"", "", Position::default());
        let xml = doc.finish().unwrap();
        assert!(xml.contains("name=\"a &amp; b\""));
        assert!(xml.contains("value=\"x &lt; y\""));
        assert!(xml.contains("value=\"say &quot;hi&quot;\""));
    }

    #[test]
    fn test_child_vertex_parent() {
        let mut doc = DrawioDocument::new("page");
        let table = doc.add_vertex("USER", "swimlane;", Position::new(0, 0, 160, 60));
        doc.add_child_vertex(&table, "int id", "text;", Position::new(0, 30, 160, 30));
        let xml = doc.finish().unwrap();
        assert!(xml.contains(&format!("vertex=\"1\" parent=\"{}\"", table)));
    }
}
