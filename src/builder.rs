//! Reads the XML description of the main window.
//!
//! ```xml
//! <interface>
//!   <window id="MainWindow" title="Demo" width="1000" height="720">
//!     <canvas id="MainCanvas"/>
//!     <grid id="InnerGrid">
//!       <button id="ZoomInButton" label="Zoom In" left="0" top="0" width="3"/>
//!       <combo id="Mode" top="1"><option>fast</option><option>slow</option></combo>
//!     </grid>
//!     <statusbar id="StatusBar"/>
//!   </window>
//! </interface>
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use roxmltree::{Document, Node};

use crate::error::{Error, Result};
use crate::ui::{GRID_COLUMNS, GridCell, Widget, WidgetKind};

/// The layout used when the settings name no UI file.
pub const DEFAULT_UI: &str = include_str!("../data/ui/main.ui");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSource {
    File(PathBuf),
    Inline(String),
}

impl UiSource {
    pub fn load(&self) -> Result<UiDescription> {
        match self {
            UiSource::File(path) => UiDescription::from_file(path),
            UiSource::Inline(xml) => UiDescription::parse(xml),
        }
    }
}

impl Default for UiSource {
    fn default() -> Self {
        UiSource::Inline(DEFAULT_UI.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowDecl {
    pub id: String,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridDecl {
    pub id: String,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiDescription {
    pub window: WindowDecl,
    /// In declaration order.
    pub canvases: Vec<String>,
    pub grid: Option<GridDecl>,
    pub statusbar: Option<String>,
}

impl UiDescription {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&xml)
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let document = Document::parse(xml)?;
        let root = document.root_element();
        if !root.has_tag_name("interface") {
            return Err(Error::Layout(format!(
                "expected <interface>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut description = UiDescription::default();
        let mut found_window = false;
        for node in root.children().filter(Node::is_element) {
            match node.tag_name().name() {
                "window" if !found_window => {
                    found_window = true;
                    parse_window(node, &mut description)?;
                }
                "window" => log::warn!("ignoring extra <window>"),
                other => log::warn!("ignoring unknown element <{other}>"),
            }
        }

        if !found_window {
            return Err(Error::Layout("no <window> element".to_string()));
        }
        Ok(description)
    }

    /// Every id the description declares.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.window.id.as_str())
            .chain(self.canvases.iter().map(String::as_str))
            .chain(self.grid.iter().flat_map(|grid| {
                std::iter::once(grid.id.as_str()).chain(grid.widgets.iter().map(|w| w.id.as_str()))
            }))
            .chain(self.statusbar.as_deref())
    }

    pub fn declares(&self, id: &str) -> bool {
        self.ids().any(|declared| declared == id)
    }
}

fn required<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        Error::Layout(format!(
            "<{}> is missing the '{name}' attribute",
            node.tag_name().name()
        ))
    })
}

fn number<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<Option<T>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            Error::Layout(format!(
                "<{}> has an invalid '{name}': {value:?}",
                node.tag_name().name()
            ))
        }),
    }
}

fn parse_window(node: Node<'_, '_>, description: &mut UiDescription) -> Result<()> {
    description.window = WindowDecl {
        id: required(node, "id")?.to_string(),
        title: node.attribute("title").map(str::to_string),
        width: number(node, "width")?,
        height: number(node, "height")?,
    };

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "canvas" => {
                let id = required(child, "id")?.to_string();
                if description.canvases.contains(&id) {
                    return Err(Error::DuplicateCanvas(id));
                }
                description.canvases.push(id);
            }
            "grid" => description.grid = Some(parse_grid(child)?),
            "statusbar" => description.statusbar = Some(required(child, "id")?.to_string()),
            other => log::warn!("ignoring unknown element <{other}> in <window>"),
        }
    }
    Ok(())
}

fn parse_grid(node: Node<'_, '_>) -> Result<GridDecl> {
    let mut grid = GridDecl {
        id: required(node, "id")?.to_string(),
        widgets: Vec::new(),
    };

    for child in node.children().filter(Node::is_element) {
        let kind = match child.tag_name().name() {
            "button" => WidgetKind::Button {
                label: required(child, "label")?.to_string(),
            },
            "label" => WidgetKind::Label {
                text: child.attribute("text").unwrap_or_default().to_string(),
            },
            "combo" => WidgetKind::ComboBox {
                options: child
                    .children()
                    .filter(|n| n.has_tag_name("option"))
                    .map(|n| n.text().unwrap_or_default().trim().to_string())
                    .collect(),
                active: number(child, "active")?.unwrap_or(0),
            },
            other => {
                log::warn!("ignoring unknown element <{other}> in <grid>");
                continue;
            }
        };

        let next_row = grid
            .widgets
            .iter()
            .map(|w| w.cell.top + w.cell.height)
            .max()
            .unwrap_or(0);
        let cell = GridCell {
            left: number(child, "left")?.unwrap_or(0),
            top: number(child, "top")?.unwrap_or(next_row),
            width: number(child, "width")?.unwrap_or(GRID_COLUMNS),
            height: number(child, "height")?.unwrap_or(1),
        };

        let id = required(child, "id")?;
        if grid.widgets.iter().any(|w| w.id == id) {
            return Err(Error::DuplicateWidget(id.to_string()));
        }
        grid.widgets.push(Widget::new(id, kind, cell));
    }
    Ok(grid)
}
