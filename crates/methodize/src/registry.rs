use fnkit::Value;

/// One of the shared value kinds methods can be installed on.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Target {
    List,
    Text,
    Record,
    Int,
    Float,
    DateTime,
    Function,
}

impl Target {
    /// The extension target a value dispatches through, if any.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::List(_) => Some(Target::List),
            Value::Text(_) => Some(Target::Text),
            Value::Record(_) => Some(Target::Record),
            Value::Int(_) => Some(Target::Int),
            Value::Float(_) => Some(Target::Float),
            Value::DateTime(_) => Some(Target::DateTime),
            Value::Builtin(_) => Some(Target::Function),
            _ => None,
        }
    }
}

/// Which operations get installed on which target.
///
/// The names must each resolve through the utilities library; the
/// installer refuses to proceed past one that does not. Targets with an
/// empty method set are reserved and skipped without error.
pub const REGISTRY: &[(Target, &[&str])] = &[
    (
        Target::List,
        &[
            "adjust",
            "all",
            "any",
            "aperture",
            "append",
            "chain",
            "concat",
            "contains",
            "drop",
            "dropLast",
            "dropLastWhile",
            "dropWhile",
            "filter",
            "find",
            "findIndex",
            "findLast",
            "findLastIndex",
            "flatten",
            "forEach",
            "fromPairs",
            "groupBy",
            "groupWith",
            "head",
            "indexBy",
            "indexOf",
            "init",
            "insert",
            "insertAll",
            "intersperse",
            "join",
            "last",
            "lastIndexOf",
            "map",
            "mapAccum",
            "mapAccumRight",
            "mergeAll",
            "none",
            "nth",
            "pair",
            "partition",
            "pluck",
            "prepend",
            "reduce",
            "reduceBy",
            "reduceRight",
            "reject",
            "remove",
            "repeat",
            "reverse",
            "scan",
            "slice",
            "sort",
            "sortBy",
            "sortWith",
            "splitAt",
            "splitEvery",
            "splitWhen",
            "startsWith",
            "tail",
            "take",
            "takeLast",
            "takeLastWhile",
            "takeWhile",
            "transpose",
            "unfold",
            "uniq",
            "uniqBy",
            "uniqWith",
            "unnest",
            "update",
            "without",
            "xprod",
            "zip",
            "zipObj",
            "zipWith",
        ],
    ),
    (Target::DateTime, &[]),
    (Target::Function, &[]),
    (Target::Int, &[]),
    (Target::Float, &[]),
    (Target::Record, &[]),
    (Target::Text, &[]),
];
