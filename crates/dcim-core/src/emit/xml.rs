// ── Nested XML documents ──
//
// `<?xml …?>` header, `<dcim>` root, two-space indentation. Attributes
// carry every scalar; child collections become nested elements. An
// empty collection is omitted (including the `<interfaces>` wrapper) and
// an element left without children is written self-closing.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::CoreError;
use crate::model::{DeviceNode, Interface, LocationNode, RackDeviceNode, RackNode, SiteNode};

const ROOT: &str = "dcim";

struct Document {
    writer: Writer<Vec<u8>>,
}

impl Document {
    fn new() -> Result<Self, CoreError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(CoreError::xml)?;
        Ok(Self { writer })
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), CoreError> {
        self.writer.write_event(event).map_err(CoreError::xml)
    }

    /// Write `<name attrs…>`, then its children if there are any, then the
    /// close tag. Without children the element is self-closing.
    fn element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        has_children: bool,
        children: impl FnOnce(&mut Self) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            let value = attr_value(value);
            start.push_attribute((key.as_bytes(), value.as_bytes()));
        }
        if !has_children {
            return self.event(Event::Empty(start));
        }
        self.event(Event::Start(start))?;
        children(self)?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), CoreError> {
        self.element(name, attrs, false, |_| Ok(()))
    }

    fn interfaces(&mut self, interfaces: &[Interface]) -> Result<(), CoreError> {
        if interfaces.is_empty() {
            return Ok(());
        }
        self.element("interfaces", &[], true, |doc| {
            interfaces.iter().try_for_each(|i| {
                doc.leaf(
                    "interface",
                    &[("name", i.name.as_str()), ("type", i.interface_type.as_str())],
                )
            })
        })
    }

    fn finish(self) -> Result<String, CoreError> {
        let mut out = String::from_utf8(self.writer.into_inner())
            .map_err(|e| CoreError::Internal(format!("non-UTF-8 XML output: {e}")))?;
        out.push('\n');
        Ok(out)
    }
}

/// Escape an attribute value. Whitespace other than the plain space is
/// written as a character reference so parsers do not normalize it away;
/// characters XML 1.0 cannot carry become U+FFFD.
fn attr_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {
                out.push('\u{fffd}');
            }
            _ => out.push(c),
        }
    }
    out
}

// ── Site hierarchy ───────────────────────────────────────────────────

/// Serialize the site tree as `<dcim><site><location><rack><device>…`.
pub fn site_document(sites: &[SiteNode]) -> Result<String, CoreError> {
    let mut doc = Document::new()?;
    doc.element(ROOT, &[], !sites.is_empty(), |doc| {
        sites.iter().try_for_each(|s| write_site(doc, s))
    })?;
    doc.finish()
}

fn write_site(doc: &mut Document, site: &SiteNode) -> Result<(), CoreError> {
    let id = site.id.to_string();
    doc.element(
        "site",
        &[("id", id.as_str()), ("name", site.name.as_str())],
        !site.locations.is_empty(),
        |doc| site.locations.iter().try_for_each(|l| write_location(doc, l)),
    )
}

fn write_location(doc: &mut Document, location: &LocationNode) -> Result<(), CoreError> {
    let id = location.id.to_string();
    doc.element(
        "location",
        &[("id", id.as_str()), ("name", location.name.as_str())],
        !location.racks.is_empty(),
        |doc| location.racks.iter().try_for_each(|r| write_rack(doc, r)),
    )
}

fn write_rack(doc: &mut Document, rack: &RackNode) -> Result<(), CoreError> {
    let id = rack.id.to_string();
    let u_height = rack.u_height.to_string();
    doc.element(
        "rack",
        &[
            ("id", id.as_str()),
            ("name", rack.name.as_str()),
            ("uHeight", u_height.as_str()),
        ],
        !rack.devices.is_empty(),
        |doc| rack.devices.iter().try_for_each(|d| write_rack_device(doc, d)),
    )
}

fn write_rack_device(doc: &mut Document, device: &RackDeviceNode) -> Result<(), CoreError> {
    let height = device.height.to_string();
    doc.element(
        "device",
        &[
            ("position", device.position.as_str()),
            ("height", height.as_str()),
            ("name", device.name.as_str()),
            ("type", device.model.as_str()),
            ("status", device.status.as_str()),
        ],
        !device.interfaces.is_empty(),
        |doc| doc.interfaces(&device.interfaces),
    )
}

// ── Device inventory ─────────────────────────────────────────────────

/// Serialize the device tree as `<dcim><device><type/><rack/>…`.
pub fn device_document(devices: &[DeviceNode]) -> Result<String, CoreError> {
    let mut doc = Document::new()?;
    doc.element(ROOT, &[], !devices.is_empty(), |doc| {
        devices.iter().try_for_each(|d| write_device(doc, d))
    })?;
    doc.finish()
}

fn write_device(doc: &mut Document, device: &DeviceNode) -> Result<(), CoreError> {
    let id = device.id.to_string();
    let u_height = device.device_type.u_height.to_string();
    // `<type>` is always written, so a device element is never empty.
    doc.element(
        "device",
        &[
            ("id", id.as_str()),
            ("name", device.name.as_str()),
            ("status", device.status.as_str()),
            ("serialNumber", device.serial_number.as_str()),
            ("assetTag", device.asset_tag.as_str()),
        ],
        true,
        |doc| {
            doc.leaf(
                "type",
                &[
                    ("model", device.device_type.model.as_str()),
                    ("manufacturer", device.device_type.manufacturer.as_str()),
                    ("uHeight", u_height.as_str()),
                ],
            )?;
            if let Some(rack) = &device.rack {
                doc.leaf(
                    "rack",
                    &[("name", rack.name.as_str()), ("position", rack.position.as_str())],
                )?;
            }
            if let Some(tenant) = &device.tenant {
                doc.leaf("tenant", &[("name", tenant.name.as_str())])?;
            }
            doc.interfaces(&device.interfaces)
        },
    )
}
