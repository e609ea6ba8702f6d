//! Declarative layout of the physics telemetry record
//!
//! The simulator writes one fixed-layout record into the `acpmf_physics`
//! page: primitive values packed back to back, no padding, in a wire order
//! that never changes within a protocol revision. [`RecordLayout`] captures
//! that order as a flat table of [`FieldDescriptor`]s and derives the exact
//! byte size a conforming record must have.
//!
//! Layouts are immutable. Tracking a new protocol revision means defining a
//! new table, never editing one in place: inserting or resizing a field
//! silently shifts the offset of everything after it.

use std::sync::OnceLock;

use crate::error::{Result, TelemetryError};

/// Primitive element kinds the wire format carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// 32-bit signed integer, little-endian
    Int32,
    /// 32-bit IEEE-754 float, little-endian
    Float32,
}

impl ElementKind {
    /// Byte width of one element on the wire
    #[inline(always)]
    pub const fn byte_width(self) -> usize {
        4
    }
}

/// One field of the telemetry record
///
/// `count` of 0 or 1 means a scalar; anything larger a fixed-size array.
/// Fields with `available == false` occupy wire space like any other and
/// must be consumed during decoding, but never appear in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: ElementKind,
    pub count: usize,
    pub available: bool,
}

impl FieldDescriptor {
    /// Scalar 32-bit integer field
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ElementKind::Int32,
            count: 0,
            available: true,
        }
    }

    /// Scalar 32-bit float field
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: ElementKind::Float32,
            count: 0,
            available: true,
        }
    }

    /// Fixed-size array of 32-bit floats
    pub const fn floats(name: &'static str, count: usize) -> Self {
        Self {
            name,
            kind: ElementKind::Float32,
            count,
            available: true,
        }
    }

    /// Fixed-size array of 32-bit integers
    pub const fn ints(name: &'static str, count: usize) -> Self {
        Self {
            name,
            kind: ElementKind::Int32,
            count,
            available: true,
        }
    }

    /// Mark the field as reserved: its bytes are consumed but hidden
    pub const fn reserved(self) -> Self {
        Self {
            available: false,
            ..self
        }
    }

    /// Number of primitive elements this field occupies on the wire
    #[inline]
    pub const fn element_count(&self) -> usize {
        if self.count > 1 {
            self.count
        } else {
            1
        }
    }

    /// Wire size of this field in bytes
    #[inline]
    pub const fn byte_size(&self) -> usize {
        self.element_count() * self.kind.byte_width()
    }
}

/// Ordered, immutable field table defining one record's wire shape
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    fields: &'static [FieldDescriptor],
}

impl RecordLayout {
    /// Wrap a field table, rejecting duplicate names
    pub fn new(fields: &'static [FieldDescriptor]) -> Result<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(TelemetryError::Schema {
                    reason: format!("duplicate field name '{}'", field.name),
                });
            }
        }
        Ok(Self { fields })
    }

    /// The field table in wire order
    #[inline]
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Total number of primitive elements in one record
    pub fn element_count(&self) -> usize {
        self.fields.iter().map(|f| f.element_count()).sum()
    }

    /// Exact byte length a conforming record buffer must have
    pub fn byte_size(&self) -> usize {
        self.fields.iter().map(|f| f.byte_size()).sum()
    }
}

/// Field table of the `acpmf_physics` page
///
/// Wire order and names follow the simulator's shared-memory protocol.
/// Fields the protocol documents as not used / not shown in ACC are marked
/// reserved: the simulator still writes them, so they must be consumed.
static PHYSICS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::int("packetId"),
    FieldDescriptor::float("gas"),
    FieldDescriptor::float("brake"),
    FieldDescriptor::float("fuel"),
    FieldDescriptor::int("gear"),
    FieldDescriptor::int("rpm"),
    FieldDescriptor::float("steerAngle"),
    FieldDescriptor::float("speedKmh"),
    FieldDescriptor::floats("velocity", 3),
    FieldDescriptor::floats("accG", 3),
    FieldDescriptor::floats("wheelSlip", 4),
    FieldDescriptor::floats("wheelLoad", 4),
    FieldDescriptor::floats("wheelPressure", 4),
    FieldDescriptor::floats("wheelAngularSpeed", 4),
    FieldDescriptor::floats("tyreWear", 4),
    FieldDescriptor::floats("tyreDirtyLevel", 4),
    FieldDescriptor::floats("TyreCoreTemp", 4),
    FieldDescriptor::floats("camberRAD", 4),
    FieldDescriptor::floats("suspensionTravel", 4),
    FieldDescriptor::float("drs"),
    FieldDescriptor::float("tc"),
    FieldDescriptor::float("heading"),
    FieldDescriptor::float("pitch"),
    FieldDescriptor::float("roll"),
    FieldDescriptor::float("cgHeight"),
    FieldDescriptor::floats("carDamage", 5),
    FieldDescriptor::int("numberOfTyresOut"),
    FieldDescriptor::int("pitLimiterOn"),
    FieldDescriptor::float("abs"),
    FieldDescriptor::float("kersCharge").reserved(),
    FieldDescriptor::float("kersInput").reserved(),
    FieldDescriptor::int("autoshifterOn"),
    FieldDescriptor::floats("rideHeight", 2),
    FieldDescriptor::float("turboBoost"),
    FieldDescriptor::float("ballast"),
    FieldDescriptor::float("airDensity"),
    FieldDescriptor::float("airTemp"),
    FieldDescriptor::float("roadTemp"),
    FieldDescriptor::floats("localAngularVel", 3),
    FieldDescriptor::float("finalFF"),
    FieldDescriptor::float("performanceMeter").reserved(),
    FieldDescriptor::int("engineBrake").reserved(),
    FieldDescriptor::int("ersRecoveryLevel").reserved(),
    FieldDescriptor::int("ersPowerLevel").reserved(),
    FieldDescriptor::int("ersHeatCharging").reserved(),
    FieldDescriptor::int("ersIsCharging").reserved(),
    FieldDescriptor::float("kersCurrentKJ").reserved(),
    FieldDescriptor::int("drsAvailable").reserved(),
    FieldDescriptor::int("drsEnabled").reserved(),
    FieldDescriptor::floats("brakeTemp", 4),
    FieldDescriptor::float("clutch"),
    FieldDescriptor::floats("tyreTempI", 4).reserved(),
    FieldDescriptor::floats("tyreTempM", 4).reserved(),
    FieldDescriptor::floats("tyreTempO", 4).reserved(),
    FieldDescriptor::int("isAIControlled"),
    FieldDescriptor::floats("tyreContactPoint", 12),
    FieldDescriptor::floats("tyreContactNormal", 12),
    FieldDescriptor::floats("tyreContactHeading", 12),
    FieldDescriptor::float("brakeBias"),
    FieldDescriptor::floats("localVelocity", 3),
    FieldDescriptor::int("P2PActivation").reserved(),
    FieldDescriptor::int("P2PStatus").reserved(),
    FieldDescriptor::float("currentMaxRpm"),
    FieldDescriptor::floats("mz", 4).reserved(),
    FieldDescriptor::floats("fx", 4).reserved(),
    FieldDescriptor::floats("fy", 4).reserved(),
    FieldDescriptor::floats("slipRatio", 4),
    FieldDescriptor::floats("slipAngle", 4),
    FieldDescriptor::int("tcinAction"),
    FieldDescriptor::int("absInAction"),
    FieldDescriptor::floats("suspensionDamage", 4),
    FieldDescriptor::floats("tyreTemp", 4),
    FieldDescriptor::float("waterTemp"),
    FieldDescriptor::floats("brakePressure", 4),
    FieldDescriptor::int("frontBrakeCompound"),
    FieldDescriptor::int("rearBrakeCompound"),
    FieldDescriptor::floats("padLife", 4),
    FieldDescriptor::floats("discLife", 4),
    FieldDescriptor::int("ignitionOn"),
    FieldDescriptor::int("starterEngineOn"),
    FieldDescriptor::int("isEngineRunning"),
    FieldDescriptor::float("kerbVibration"),
    FieldDescriptor::float("slipVibrations"),
    FieldDescriptor::float("gVibrations"),
    FieldDescriptor::float("absVibrations"),
];

/// Layout of the `acpmf_physics` page, built once for the process lifetime
pub fn physics_layout() -> &'static RecordLayout {
    static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        RecordLayout::new(PHYSICS_FIELDS).expect("physics field table has unique names")
    })
}
