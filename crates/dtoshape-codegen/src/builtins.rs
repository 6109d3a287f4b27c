//! Platform types recognised by name, without asking the provider.

/// Structural category of a well-known platform type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Number,
    Boolean,
    Text,
    Date,
    Uuid,
    /// The universal supertype.
    Object,
    Collection,
    Map,
    /// `Optional<T>`: the value or absent.
    Optional,
    /// `OptionalInt` and friends.
    OptionalNumber,
}

const NUMBER: &[&str] = &[
    "byte",
    "short",
    "int",
    "long",
    "float",
    "double",
    "java.lang.Byte",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.Number",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.util.concurrent.atomic.AtomicInteger",
    "java.util.concurrent.atomic.AtomicLong",
    "java.util.concurrent.atomic.DoubleAdder",
    "java.util.concurrent.atomic.LongAdder",
];

const BOOLEAN: &[&str] = &[
    "boolean",
    "java.lang.Boolean",
    "java.util.concurrent.atomic.AtomicBoolean",
];

const TEXT: &[&str] = &[
    "char",
    "java.lang.Character",
    "java.lang.String",
    "java.lang.CharSequence",
    "java.lang.StringBuilder",
    "java.lang.StringBuffer",
    "java.net.URI",
    "java.net.URL",
];

const DATE: &[&str] = &[
    "java.util.Date",
    "java.util.Calendar",
    "java.sql.Date",
    "java.sql.Time",
    "java.sql.Timestamp",
    "java.time.Instant",
    "java.time.LocalDate",
    "java.time.LocalDateTime",
    "java.time.LocalTime",
    "java.time.OffsetDateTime",
    "java.time.OffsetTime",
    "java.time.ZonedDateTime",
    "java.time.YearMonth",
    "java.time.Year",
];

const COLLECTION: &[&str] = &[
    "java.lang.Iterable",
    "java.util.Collection",
    "java.util.List",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.Set",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.SortedSet",
    "java.util.NavigableSet",
    "java.util.TreeSet",
    "java.util.EnumSet",
    "java.util.Queue",
    "java.util.Deque",
    "java.util.ArrayDeque",
    "java.util.PriorityQueue",
    "java.util.Vector",
    "java.util.Stack",
    "java.util.concurrent.CopyOnWriteArrayList",
];

const MAP: &[&str] = &[
    "java.util.Map",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.SortedMap",
    "java.util.NavigableMap",
    "java.util.TreeMap",
    "java.util.EnumMap",
    "java.util.Hashtable",
    "java.util.Properties",
    "java.util.concurrent.ConcurrentMap",
    "java.util.concurrent.ConcurrentHashMap",
];

/// Simple names that resolve without an import: `java.lang` plus the
/// collection interfaces fixtures commonly write unqualified.
const IMPLICIT_PACKAGES: &[&str] = &["java.lang.", "java.util.", "java.math.", "java.time."];

/// Classify a type name, qualified or implicitly imported.
pub(crate) fn classify(name: &str) -> Option<Builtin> {
    if let Some(builtin) = classify_exact(name) {
        return Some(builtin);
    }
    if name.contains('.') {
        return None;
    }
    IMPLICIT_PACKAGES
        .iter()
        .find_map(|pkg| classify_exact(&format!("{}{}", pkg, name)))
}

fn classify_exact(name: &str) -> Option<Builtin> {
    let builtin = match name {
        "java.lang.Object" => Builtin::Object,
        "java.util.UUID" => Builtin::Uuid,
        "java.util.Optional" => Builtin::Optional,
        "java.util.OptionalInt" | "java.util.OptionalLong" | "java.util.OptionalDouble" => {
            Builtin::OptionalNumber
        }
        n if NUMBER.contains(&n) => Builtin::Number,
        n if BOOLEAN.contains(&n) => Builtin::Boolean,
        n if TEXT.contains(&n) => Builtin::Text,
        n if DATE.contains(&n) => Builtin::Date,
        n if COLLECTION.contains(&n) => Builtin::Collection,
        n if MAP.contains(&n) => Builtin::Map,
        _ => return None,
    };
    Some(builtin)
}
