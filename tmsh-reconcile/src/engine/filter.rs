//! Noise filtering of raw listing lines.

use log::trace;

use crate::resource::{Dialect, ResourceKind, Terminator};

/// What a single listing line is, for a given kind and object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// The device reported the object as missing.
    Sentinel,
    /// The object's own header, `<object path> <name> {`.
    Header,
    /// First line of a multi-line block absorbed into `field`.
    Block { field: String, terminator: Terminator },
    Noise,
    Blank,
    /// A candidate `field value` line.
    Data,
}

/// Classifies listing lines and drops the ones that carry no field data.
///
/// Blocks are kept verbatim so the extractor can absorb them again.
#[derive(Debug, Clone)]
pub struct LineFilter<'a> {
    kind: &'a ResourceKind,
    dialect: &'a Dialect,
    name: &'a str,
}

impl<'a> LineFilter<'a> {
    pub fn new(kind: &'a ResourceKind, dialect: &'a Dialect, name: &'a str) -> Self {
        Self {
            kind,
            dialect,
            name,
        }
    }

    pub fn kind(&self) -> &'a ResourceKind {
        self.kind
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    /// Classify one raw line.
    pub fn classify(&self, line: &str) -> LineClass {
        if self.dialect.is_not_found(line) {
            return LineClass::Sentinel;
        }
        let content = self.dialect.content(line);
        if content.is_empty() {
            return LineClass::Blank;
        }
        if self.is_header(content) {
            return LineClass::Header;
        }
        if let Some(composite) = self.kind.composite_starting(content) {
            return LineClass::Block {
                field: composite.name.clone(),
                terminator: composite.terminator.clone(),
            };
        }
        if self.dialect.is_prompt(content) || self.kind.is_noise(content) {
            return LineClass::Noise;
        }
        if let Some(field) = anonymous_block(content) {
            return LineClass::Block {
                field: field.to_string(),
                terminator: Terminator::ClosingBrace,
            };
        }
        LineClass::Data
    }

    /// `<object path> <name> {`, where the name may carry a folder path.
    fn is_header(&self, content: &str) -> bool {
        let Some(rest) = content.strip_suffix('{') else {
            return false;
        };
        let Some(rest) = rest.trim_end().strip_prefix(self.kind.object_path.as_str()) else {
            return false;
        };
        let listed = rest.trim();
        listed.rsplit('/').next() == Some(self.name)
    }

    /// Locate the end of the block opened at `start`.
    ///
    /// Returns the index of the block's last line and the index where the
    /// scan continues, or `None` when the terminator is never reached.
    pub fn block_end<S: AsRef<str>>(
        &self,
        lines: &[S],
        start: usize,
        terminator: &Terminator,
    ) -> Option<(usize, usize)> {
        match terminator {
            Terminator::ClosingBrace => {
                let mut depth: i64 = 0;
                for (i, line) in lines.iter().enumerate().skip(start) {
                    let content = self.dialect.content(line.as_ref());
                    depth += content.matches('{').count() as i64;
                    depth -= content.matches('}').count() as i64;
                    if depth <= 0 {
                        return Some((i, i + 1));
                    }
                }
                None
            }
            Terminator::Before(marker) => lines
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, line)| line.as_ref().contains(marker.as_str()))
                .map(|(i, _)| (i - 1, i)),
            Terminator::Through(marker) => lines
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, line)| line.as_ref().contains(marker.as_str()))
                .map(|(i, _)| (i, i + 1)),
        }
    }

    /// The subsequence of `lines` that carries field data.
    pub fn filter<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut kept = Vec::with_capacity(lines.len());
        let mut cursor = 0;
        while cursor < lines.len() {
            let line = lines[cursor].as_ref();
            match self.classify(line) {
                LineClass::Sentinel | LineClass::Header | LineClass::Data => {
                    kept.push(line.to_string());
                    cursor += 1;
                }
                LineClass::Block { terminator, .. } => {
                    match self.block_end(lines, cursor, &terminator) {
                        Some((last, next)) => {
                            kept.extend(lines[cursor..=last].iter().map(|l| l.as_ref().to_string()));
                            cursor = next;
                        }
                        None => {
                            kept.push(line.to_string());
                            cursor += 1;
                        }
                    }
                }
                LineClass::Noise | LineClass::Blank => {
                    trace!("filter: dropped {:?}", line);
                    cursor += 1;
                }
            }
        }
        kept
    }
}

/// `name {` on its own: a block the kind does not register.
fn anonymous_block(content: &str) -> Option<&str> {
    let rest = content.strip_suffix('{')?.trim_end();
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::kinds::{tcp, virtual_server};

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_classify_tcp_listing() {
        let kind = tcp::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "t1");

        assert_eq!(filter.classify("ltm profile tcp t1 {"), LineClass::Header);
        assert_eq!(filter.classify("ltm profile tcp /Common/t1 {"), LineClass::Header);
        assert_eq!(filter.classify("ltm profile tcp t10 {"), LineClass::Noise);
        assert_eq!(filter.classify("    idle-timeout 300"), LineClass::Data);
        assert_eq!(filter.classify("    defaults-from /Common/tcp"), LineClass::Noise);
        assert_eq!(filter.classify("}"), LineClass::Noise);
        assert_eq!(filter.classify("   "), LineClass::Blank);
        assert_eq!(
            filter.classify("01020036:3: The requested profile (/Common/t1) was not found."),
            LineClass::Sentinel
        );
    }

    #[test]
    fn test_composite_start_wins_over_noise() {
        let kind = virtual_server::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "vs1");
        assert_eq!(
            filter.classify("    profiles {"),
            LineClass::Block {
                field: "profiles".into(),
                terminator: Terminator::ClosingBrace
            }
        );
        assert_eq!(
            filter.classify("    metadata {"),
            LineClass::Block {
                field: "metadata".into(),
                terminator: Terminator::ClosingBrace
            }
        );
    }

    #[test]
    fn test_block_end_closing_brace() {
        let kind = virtual_server::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "vs1");
        let listing = lines(
            "    profiles {\n        /Common/http {\n            context all\n        }\n    }\n    rate-class none",
        );
        assert_eq!(
            filter.block_end(&listing, 0, &Terminator::ClosingBrace),
            Some((4, 5))
        );
        let single = lines("    rules none\n    pool p1");
        assert_eq!(
            filter.block_end(&single, 0, &Terminator::ClosingBrace),
            Some((0, 1))
        );
        let cut = lines("    profiles {\n        /Common/http {");
        assert_eq!(filter.block_end(&cut, 0, &Terminator::ClosingBrace), None);
    }

    #[test]
    fn test_block_end_markers() {
        let kind = virtual_server::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "vs1");
        let listing = lines("    profiles {\n        /Common/http { }\n    }\n    rate-class none");
        assert_eq!(
            filter.block_end(&listing, 0, &Terminator::Before("rate-class".into())),
            Some((2, 3))
        );
        assert_eq!(
            filter.block_end(&listing, 0, &Terminator::Through("rate-class".into())),
            Some((3, 4))
        );
        assert_eq!(
            filter.block_end(&listing, 0, &Terminator::Through("source-port".into())),
            None
        );
    }

    #[test]
    fn test_filter_keeps_blocks_and_data() {
        let kind = virtual_server::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "vs1");
        let listing = lines(
            "[admin@bigip:Active:Standalone] ~ # tmsh\n\
             ltm virtual vs1 {\n\
             \x20   creation-time 2026-10-01:09:12:44\n\
             \x20   destination 10.1.1.10%0:443\n\
             \x20   profiles {\n\
             \x20       /Common/tcp { }\n\
             \x20   }\n\
             \x20   vlans-disabled\n\
             }\n\
             \n",
        );
        let kept = filter.filter(&listing);
        assert_eq!(
            kept,
            vec![
                "ltm virtual vs1 {",
                "    destination 10.1.1.10%0:443",
                "    profiles {",
                "        /Common/tcp { }",
                "    }",
                "    vlans-disabled",
            ]
        );
    }

    #[test]
    fn test_values_never_match_noise() {
        let kind = virtual_server::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "vs1");
        assert_eq!(filter.classify("    pool /Common/ltm_pool_app"), LineClass::Data);
        assert_eq!(filter.classify("    rate-class tmos_rate_END"), LineClass::Data);
        assert_eq!(filter.classify("    source-port preserve-strict"), LineClass::Data);
        assert_eq!(filter.classify("    description \"owned by ops@corp\""), LineClass::Noise);
        assert_eq!(filter.classify("(END)"), LineClass::Noise);
        assert_eq!(
            filter.classify("admin@(bigip)(cfg-sync Standalone)(Active)(/Common)(tmos)# list ltm virtual vs1 all-properties"),
            LineClass::Noise
        );
    }

    #[test]
    fn test_pager_line_is_data() {
        let kind = tcp::kind();
        let dialect = Dialect::tmsh();
        let filter = LineFilter::new(&kind, &dialect, "t1");
        assert_eq!(
            filter.classify("---(less 62%)---    zero-window-timeout 20000"),
            LineClass::Data
        );
        assert_eq!(filter.classify("---(less 99%)---"), LineClass::Blank);
    }
}
