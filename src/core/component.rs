//! Components and the calendar container (RFC 5545 §3.4-3.6).

use super::Property;
use crate::parse::ValueError;

/// Component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// STANDARD sub-component of VTIMEZONE.
    Standard,
    /// DAYLIGHT sub-component of VTIMEZONE.
    Daylight,
    /// Unknown or experimental component.
    Other,
}

impl ComponentKind {
    /// Returns the canonical component name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::Other => "X-UNKNOWN",
        }
    }

    /// Classifies a component name (case-insensitive).
    #[must_use]
    pub fn classify(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            _ => Self::Other,
        }
    }

    /// Returns whether this kind can carry recurrence properties.
    #[must_use]
    pub const fn is_recurring_kind(self) -> bool {
        matches!(self, Self::Event | Self::Todo | Self::Journal)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named block of properties and nested sub-components.
///
/// The original name is preserved (BEGIN/END matching and property lookup
/// are case-insensitive, output keeps the input spelling).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    /// Classified kind.
    pub kind: Option<ComponentKind>,
    /// Component name in its original case.
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components in order of appearance.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates an empty component of the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind: Some(kind),
            name: kind.as_str().to_string(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a component with an arbitrary name (for X-components).
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: Some(ComponentKind::classify(&name)),
            name,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a property.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Adds a child component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name (case-insensitive).
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.is(name))
    }

    /// Returns every property with the given name, in order.
    #[must_use]
    pub fn properties(&self, name: &str) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.is(name)).collect()
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.property("UID")?.as_text()
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.property("SUMMARY")?.as_text()
    }

    /// Returns the DESCRIPTION property value if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.property("DESCRIPTION")?.as_text()
    }

    /// Returns the DTSTART value if present.
    #[must_use]
    pub fn dtstart(&self) -> Option<&super::DateTime> {
        self.property("DTSTART")?.as_datetime()
    }

    /// Returns the RECURRENCE-ID value if present, marking this
    /// component as an override of a base instance.
    #[must_use]
    pub fn recurrence_id(&self) -> Option<&super::DateTime> {
        self.property("RECURRENCE-ID")?.as_datetime()
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children
            .iter()
            .filter(|c| c.kind == Some(kind))
            .collect()
    }

    /// Returns all VALARM children.
    #[must_use]
    pub fn alarms(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Alarm)
    }
}

/// The root VCALENDAR container.
///
/// Owns its components exclusively; back-references from children to the
/// calendar are never stored, lookups that need calendar context (zone
/// resolution) take the calendar as an argument instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calendar {
    /// The root VCALENDAR component.
    pub root: Component,
    /// Value errors recorded during a lenient parse, in source order.
    pub diagnostics: Vec<ValueError>,
}

impl Calendar {
    /// Creates an empty calendar with mandatory VERSION and PRODID.
    #[must_use]
    pub fn new(prodid: impl Into<String>) -> Self {
        let mut root = Component::new(ComponentKind::Calendar);
        root.add_property(Property::text("VERSION", "2.0"));
        root.add_property(Property::text("PRODID", prodid));
        Self {
            root,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the VERSION value.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.property("VERSION")?.as_text()
    }

    /// Returns the PRODID value.
    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.property("PRODID")?.as_text()
    }

    /// Returns the CALSCALE value (defaults to "GREGORIAN").
    #[must_use]
    pub fn calscale(&self) -> &str {
        self.root
            .property("CALSCALE")
            .and_then(Property::as_text)
            .unwrap_or("GREGORIAN")
    }

    /// Returns the METHOD value if present.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.root.property("METHOD")?.as_text()
    }

    /// Adds a component, in document order.
    pub fn add_component(&mut self, component: Component) {
        self.root.add_child(component);
    }

    /// Returns all VEVENT components.
    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::Event)
    }

    /// Returns all VTODO components.
    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::Todo)
    }

    /// Returns all VJOURNAL components.
    #[must_use]
    pub fn journals(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::Journal)
    }

    /// Returns all VFREEBUSY components.
    #[must_use]
    pub fn freebusy(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::FreeBusy)
    }

    /// Returns all VTIMEZONE components.
    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.root.children_of_kind(ComponentKind::Timezone)
    }

    /// Looks up the VTIMEZONE declaring the given TZID.
    #[must_use]
    pub fn timezone(&self, tzid: &str) -> Option<&Component> {
        self.timezones().into_iter().find(|tz| {
            tz.property("TZID")
                .and_then(Property::as_text)
                .is_some_and(|id| id == tzid)
        })
    }

    /// Returns all distinct UIDs across the calendar's components.
    #[must_use]
    pub fn uids(&self) -> Vec<&str> {
        let mut uids: Vec<&str> = self.root.children.iter().filter_map(Component::uid).collect();
        uids.sort_unstable();
        uids.dedup();
        uids
    }

    /// Returns the base component (no RECURRENCE-ID) for a UID and kind.
    #[must_use]
    pub fn base_component(&self, kind: ComponentKind, uid: &str) -> Option<&Component> {
        self.root
            .children
            .iter()
            .find(|c| c.kind == Some(kind) && c.uid() == Some(uid) && c.recurrence_id().is_none())
    }

    /// Returns the RECURRENCE-ID override components for a UID and kind,
    /// linked to their base by the shared UID.
    #[must_use]
    pub fn overrides_of(&self, kind: ComponentKind, uid: &str) -> Vec<&Component> {
        self.root
            .children
            .iter()
            .filter(|c| {
                c.kind == Some(kind) && c.uid() == Some(uid) && c.recurrence_id().is_some()
            })
            .collect()
    }

    /// Merges another calendar into this one.
    ///
    /// Children are re-parented into `self` in order; `other` is consumed
    /// by the move, so the merge is single-shot by construction.
    /// Diagnostics travel with their components.
    pub fn merge(&mut self, other: Calendar) {
        self.root.children.extend(other.root.children);
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classification() {
        assert_eq!(ComponentKind::classify("VEVENT"), ComponentKind::Event);
        assert_eq!(ComponentKind::classify("vtodo"), ComponentKind::Todo);
        assert_eq!(ComponentKind::classify("X-CUSTOM"), ComponentKind::Other);
    }

    #[test]
    fn calendar_defaults() {
        let cal = Calendar::new("-//Koyomi//EN");
        assert_eq!(cal.version(), Some("2.0"));
        assert_eq!(cal.prodid(), Some("-//Koyomi//EN"));
        assert_eq!(cal.calscale(), "GREGORIAN");
        assert!(cal.method().is_none());
    }

    #[test]
    fn property_lookup_is_case_insensitive() {
        let mut event = Component::new(ComponentKind::Event);
        event.add_property(Property::text("Uid", "abc"));
        assert_eq!(event.uid(), Some("abc"));
        assert!(event.property("uid").is_some());
        assert_eq!(event.properties.first().map(|p| p.name.as_str()), Some("Uid"));
    }

    #[test]
    fn timezone_lookup_by_tzid() {
        let mut cal = Calendar::new("-//Koyomi//EN");
        let mut tz = Component::new(ComponentKind::Timezone);
        tz.add_property(Property::text("TZID", "America/New_York"));
        cal.add_component(tz);

        assert!(cal.timezone("America/New_York").is_some());
        assert!(cal.timezone("Europe/Paris").is_none());
    }

    #[test]
    fn merge_moves_children() {
        let mut a = Calendar::new("-//A//EN");
        let mut b = Calendar::new("-//B//EN");
        let mut event = Component::new(ComponentKind::Event);
        event.add_property(Property::text("UID", "from-b"));
        b.add_component(event);

        a.merge(b);
        assert_eq!(a.events().len(), 1);
        assert_eq!(a.uids(), vec!["from-b"]);
    }

    #[test]
    fn override_linking_by_uid() {
        let mut cal = Calendar::new("-//Koyomi//EN");

        let mut base = Component::new(ComponentKind::Event);
        base.add_property(Property::text("UID", "weekly"));
        cal.add_component(base);

        let mut ovr = Component::new(ComponentKind::Event);
        ovr.add_property(Property::text("UID", "weekly"));
        ovr.add_property(Property::datetime(
            "RECURRENCE-ID",
            crate::core::DateTime::utc(2006, 1, 9, 9, 0, 0),
        ));
        cal.add_component(ovr);

        assert!(cal.base_component(ComponentKind::Event, "weekly").is_some());
        assert_eq!(cal.overrides_of(ComponentKind::Event, "weekly").len(), 1);
    }
}
