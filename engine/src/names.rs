use std::collections::BTreeMap;

/// Similarity score below which a fuzzy candidate is not trusted.
const MIN_RATIO: f64 = 0.6;

/// String-similarity strategy behind the fuzzy lookup, swappable so the
/// matching policy can be tuned and tested on its own.
pub trait Similarity {
    /// Score in [0, 1]; 1 means identical.
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Levenshtein distance normalized by the longer string.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditRatio;

impl Similarity for EditRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// Canonical team-name table, seeded from the cleanest source available
/// (seed lists, in practice). Keys are cleaned spellings; values keep the
/// original casing. The ordered map keeps fuzzy tie-breaks deterministic.
#[derive(Debug, Clone, Default)]
pub struct NameTable<S = EditRatio> {
    canonical: BTreeMap<String, String>,
    similarity: S,
}

impl NameTable {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_similarity(names, EditRatio)
    }
}

impl<S: Similarity> NameTable<S> {
    pub fn with_similarity<'a>(names: impl IntoIterator<Item = &'a str>, similarity: S) -> Self {
        let canonical = names
            .into_iter()
            .map(|name| (clean(name), name.to_owned()))
            .collect();
        Self {
            canonical,
            similarity,
        }
    }

    /// Rewrite `name` to its canonical spelling when a confident match
    /// exists, otherwise return it unchanged. Never invents a team.
    pub fn resolve(&self, name: &str) -> String {
        let key = clean(name);
        if let Some(original) = self.canonical.get(&key) {
            return original.clone();
        }
        let best = self
            .canonical
            .iter()
            .map(|(candidate, original)| (self.similarity.ratio(&key, candidate), original))
            .max_by(|a, b| a.0.total_cmp(&b.0));
        match best {
            Some((ratio, original)) if ratio >= MIN_RATIO => original.clone(),
            _ => name.to_owned(),
        }
    }
}

/// Lookup key for a name: trailing parenthetical stripped, spacing around
/// `+`/`-` tightened, lower-cased. "Hammer That Zone (2)" and
/// "hammer that zone" collide on purpose.
fn clean(name: &str) -> String {
    let mut base = name.trim();
    if base.ends_with(')')
        && let Some(open) = base.rfind('(')
    {
        base = base[..open].trim_end();
    }
    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        match c {
            '+' | '-' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push(c);
            }
            ' ' if out.ends_with('+') || out.ends_with('-') => {}
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}
