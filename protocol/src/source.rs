//! `source` fields may be a single string or a list of lines on disk.
//! In memory they are always one `String`; on write they become a list of
//! lines that keep their trailing `\n`, which is what nbformat itself emits.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    Single(String),
    Lines(Vec<String>),
}

pub fn serialize<S>(source: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    lines.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineString::deserialize(deserializer)? {
        MultilineString::Single(s) => s,
        MultilineString::Lines(lines) => lines.concat(),
    })
}
