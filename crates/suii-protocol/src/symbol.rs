//! Closed symbol domains
//!
//! Every domain of the refbox protocol (locations, objects, containers and
//! task types) is a closed enum whose variants carry a fixed integer code and
//! a canonical label. The tables are bit-exact with the protocol and must not
//! be reordered or relabelled.

use crate::error::SymbolError;
use crate::registry::{SymbolRegistry, SymbolTable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

/// Integer code of a symbol within its domain
pub type Code = u16;

/// Runtime discriminant for the four symbol domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolDomain {
    /// Named places in the work-cell
    Location,
    /// Manipulable object classes
    Object,
    /// Object classes usable as a carrying vessel
    Container,
    /// Kinds of work order
    TaskType,
}

impl SymbolDomain {
    /// All domains in declaration order
    pub const ALL: [SymbolDomain; 4] = [
        SymbolDomain::Location,
        SymbolDomain::Object,
        SymbolDomain::Container,
        SymbolDomain::TaskType,
    ];

    /// Human-readable domain name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SymbolDomain::Location => "location",
            SymbolDomain::Object => "object",
            SymbolDomain::Container => "container",
            SymbolDomain::TaskType => "task type",
        }
    }
}

impl Display for SymbolDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved symbol: domain, integer code and canonical label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolCode {
    /// Domain the code belongs to
    pub domain: SymbolDomain,
    /// Integer code
    pub code: Code,
    /// Canonical protocol label
    pub label: &'static str,
}

impl Display for SymbolCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, \"{}\")", self.domain, self.code, self.label)
    }
}

/// A member of a closed symbol domain
///
/// Implementations are generated by `symbol_domain!` and are the only way a
/// code or label enters the rest of the system.
pub trait Symbol: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Domain this symbol belongs to
    const DOMAIN: SymbolDomain;

    /// Every member of the domain, in declaration order
    const ALL: &'static [Self];

    /// Integer protocol code
    fn code(self) -> Code;

    /// Canonical protocol label
    fn label(self) -> &'static str;

    /// Protocol short name (e.g. `WS`, `M20_100`)
    fn short_name(self) -> &'static str;

    /// Table for this domain inside a registry
    fn table(registry: &SymbolRegistry) -> &SymbolTable<Self>;

    /// Resolved form of this symbol
    #[inline]
    fn symbol_code(self) -> SymbolCode {
        SymbolCode {
            domain: Self::DOMAIN,
            code: self.code(),
            label: self.label(),
        }
    }
}

macro_rules! symbol_domain {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $domain:ident => $field:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal, $short:literal, $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl Symbol for $name {
            const DOMAIN: SymbolDomain = SymbolDomain::$domain;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            #[inline]
            fn code(self) -> Code {
                self as Code
            }

            #[inline]
            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            #[inline]
            fn short_name(self) -> &'static str {
                match self {
                    $($name::$variant => $short,)+
                }
            }

            #[inline]
            fn table(registry: &SymbolRegistry) -> &SymbolTable<Self> {
                &registry.$field
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = SymbolError;

            fn from_str(label: &str) -> Result<Self, Self::Err> {
                SymbolRegistry::global().lookup::<$name>(label)
            }
        }

        impl TryFrom<Code> for $name {
            type Error = SymbolError;

            fn try_from(code: Code) -> Result<Self, Self::Error> {
                SymbolRegistry::global().from_code::<$name>(code)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                label.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

symbol_domain! {
    /// Named places in the work-cell
    pub enum Location: Location => locations {
        /// Storage shelf
        Shelf = 1, "SH", "Shelf",
        /// Service workstation
        Workstation = 2, "WS", "Workstation",
        /// Conveyor belt
        ConveyorBelt = 3, "CB", "Conveyor Belt",
        /// Navigation way point
        WayPoint = 4, "WP", "Way Point",
        /// Precision placement platform
        PrecisionPlatform = 5, "PP", "Precision Platform",
        /// The robot's own on-board storage
        Robot = 6, "ROBOT", "Robot",
        /// Arena exit
        Exit = 100, "EX", "Exit",
        /// Rotating table
        RotatingTable = 404, "RT", "Rotating Table",
    }
}

impl Location {
    /// Whether the robot can drive to this location
    #[inline]
    #[must_use]
    pub fn is_navigable(self) -> bool {
        !matches!(self, Location::Robot)
    }

    /// Whether an object can be picked from or placed at this location
    #[inline]
    #[must_use]
    pub fn is_service_area(self) -> bool {
        !matches!(self, Location::Exit | Location::WayPoint)
    }
}

symbol_domain! {
    /// Manipulable object classes
    pub enum ObjectKind: Object => objects {
        /// F20_20_B
        SmallBlackProfile = 1, "F20_20_B", "Small Black Alu. Profile",
        /// F20_20_G
        SmallGreyProfile = 2, "F20_20_G", "Small Grey Alu. Profile",
        /// S40_40_B
        LargeBlackProfile = 3, "S40_40_B", "Large Black Alu. Profile",
        /// S40_40_G
        LargeGreyProfile = 4, "S40_40_G", "Large Grey Alu. Profile",
        /// M20_100
        Bolt = 5, "M20_100", "Bolt",
        /// M20
        SmallNut = 6, "M20", "Small Nut",
        /// M30
        LargeNut = 7, "M30", "Large Nut",
        /// R20
        PlasticTube = 8, "R20", "Plastic Tube",
        /// BEARING_BOX
        BearingBox = 9, "BEARING_BOX", "Bearing Box",
        /// BEARING
        Bearing = 10, "BEARING", "Bearing",
        /// AXIS
        Axis = 11, "AXIS", "Axis",
        /// DISTANCE_TUBE
        DistanceTube = 12, "DISTANCE_TUBE", "Distance Tube",
        /// MOTOR
        Motor = 13, "MOTOR", "Motor",
        /// CONTAINER_B
        BlueContainer = 14, "CONTAINER_B", "Blue Container",
        /// CONTAINER_R
        RedContainer = 15, "CONTAINER_R", "Red Container",
    }
}

impl ObjectKind {
    /// Container view of this object, if it can carry other objects
    #[inline]
    #[must_use]
    pub fn as_container(self) -> Option<Container> {
        match self {
            ObjectKind::BlueContainer => Some(Container::Blue),
            ObjectKind::RedContainer => Some(Container::Red),
            _ => None,
        }
    }
}

symbol_domain! {
    /// Object classes usable as a carrying vessel
    ///
    /// Codes and labels are shared with [`ObjectKind`].
    pub enum Container: Container => containers {
        /// CONTAINER_B
        Blue = 14, "CONTAINER_B", "Blue Container",
        /// CONTAINER_R
        Red = 15, "CONTAINER_R", "Red Container",
    }
}

impl Container {
    /// The object class this container is
    #[inline]
    #[must_use]
    pub fn as_object(self) -> ObjectKind {
        match self {
            Container::Blue => ObjectKind::BlueContainer,
            Container::Red => ObjectKind::RedContainer,
        }
    }
}

impl From<Container> for ObjectKind {
    fn from(container: Container) -> Self {
        container.as_object()
    }
}

impl TryFrom<ObjectKind> for Container {
    type Error = SymbolError;

    fn try_from(object: ObjectKind) -> Result<Self, Self::Error> {
        object.as_container().ok_or_else(|| SymbolError::UnknownCode {
            domain: SymbolDomain::Container,
            code: object.code(),
        })
    }
}

symbol_domain! {
    /// Kinds of work order
    #[non_exhaustive]
    pub enum TaskType: TaskType => task_types {
        /// Move an object from a source to a destination
        Transportation = 1, "TRANSPORTATION", "Transportation",
        /// Move the robot itself to a destination
        Navigation = 2, "NAVIGATION", "Navigation",
    }
}
