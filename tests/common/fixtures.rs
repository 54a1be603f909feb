//! Static pack corpora and filesystem helpers used across harnesses.

use std::fs;
use std::path::{Path, PathBuf};

/// NPC whose resistances are stored as one delimited string.
pub const LINE_STRING_TRAITS: &str = r#"{"_id":"gob1","name":"Goblin","type":"npc","system":{"traits":{"eres":{"value":"fire; cold"},"dr":{"value":[null,"5/magic",""]},"languages":{"value":[null,"Goblin",null]}}}}"#;

/// Character with a plus-number and a damage reduction string.
pub const LINE_CHARACTER: &str = r#"{"_id":"pc1","name":"Valeros","type":"character","system":{"abilities":{"str":{"mod":"+2"}},"traits":{"dr":{"value":"2/-","custom":"cold iron;; silver"}}},"items":[]}"#;

/// Loot document: not targeted, but its plus-number still converts.
pub const LINE_LOOT: &str = r#"{"_id":"l1","name":"Sword","type":"loot","system":{"bonus":"+1","traits":{"eres":{"value":"fire"}}}}"#;

/// Already-valid NPC that must pass through untouched.
pub const LINE_CLEAN_NPC: &str = r#"{"_id":"ok1","name":"Guard","type":"npc","system":{"traits":{"eres":{"value":[]},"dr":{"value":[]},"dv":{"value":[]},"di":{"value":[]},"ci":{"value":[]},"languages":{"value":["Common"]},"armorProf":{"value":[]},"weaponProf":{"value":[]}}},"items":[]}"#;

/// Eidolon whose second item reuses the tag `bite` and whose resources
/// shadow it.
pub const LINE_EIDOLON: &str = r#"{"_id":"eid1","name":"Biped Eidolon","type":"character","system":{"resources":{"bite":{"value":1},"rage":{"value":2}}},"items":[{"_id":"first","name":"Bite","system":{"tag":"bite"}},{"_id":"abc123","name":"Bite (evolved)","system":{"tag":"bite","actions":[{"_id":"act1","tag":"bite"}]}}]}"#;

/// A pack file mixing documents with lines that must pass through.
pub const CORPUS_PACK: &[&str] = &[
    LINE_STRING_TRAITS,
    "",
    LINE_CHARACTER,
    "this is not json",
    "[1, 2, 3]",
    LINE_LOOT,
    "   ",
    LINE_CLEAN_NPC,
    LINE_EIDOLON,
];

/// Join `lines` into file contents, one `\n` after each.
pub fn pack_text(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

/// Write a pack file at `dir/rel`, creating parent folders.
pub fn write_pack(dir: &Path, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().expect("pack path has a parent")).expect("create pack folder");
    fs::write(&path, contents).expect("write pack file");
    path
}

/// Read a written pack back as lines (terminators removed).
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        .split_terminator('\n')
        .map(String::from)
        .collect()
}
