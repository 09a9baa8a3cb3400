use crate::recording::StackFrame;

/// How frames carrying one specific formal descriptor are rewritten.
#[derive(Clone, Debug)]
pub struct DescriptorRule {
    /// Formal descriptor this rule applies to, compared verbatim.
    pub descriptor: String,
    /// Drop the declaring-type qualification from the fragment.
    pub elide_type: bool,
    /// Literal appended after the method name.
    pub suffix: Option<String>,
}

/// Descriptor-driven frame rewrite rules.
///
/// The default table carries the `()L;` and `(Lk;)L;` constructor shapes
/// produced by one family of obfuscated recordings, kept for compatibility
/// with the collapsed files people already have. Override (or empty) the
/// table when your recordings don't need them.
#[derive(Clone, Debug)]
pub struct FrameRules {
    rules: Vec<DescriptorRule>,
}

impl Default for FrameRules {
    fn default() -> Self {
        FrameRules {
            rules: vec![
                DescriptorRule {
                    descriptor: "()L;".to_owned(),
                    elide_type: true,
                    suffix: None,
                },
                DescriptorRule {
                    descriptor: "(Lk;)L;".to_owned(),
                    elide_type: true,
                    suffix: Some("_[k]".to_owned()),
                },
            ],
        }
    }
}

impl FrameRules {
    /// A table that rewrites nothing.
    pub fn none() -> FrameRules {
        FrameRules { rules: Vec::new() }
    }

    /// A table with exactly the given rules.
    pub fn with_rules(rules: Vec<DescriptorRule>) -> FrameRules {
        FrameRules { rules }
    }

    fn lookup(&self, descriptor: Option<&str>) -> Option<&DescriptorRule> {
        let descriptor = descriptor?;
        self.rules.iter().find(|rule| rule.descriptor == descriptor)
    }
}

/// Renders one frame into `out` as `<type-slash-name>.<method>`.
///
/// The type qualification (and its trailing `.`) is left out when the frame
/// has no resolvable type or a matching rule elides it; a matching rule may
/// also append its suffix after the method name.
pub fn push_frame(out: &mut String, frame: &StackFrame, rules: &FrameRules) {
    let rule = rules.lookup(frame.descriptor.as_deref());
    if !rule.map_or(false, |rule| rule.elide_type) {
        if let Some(type_name) = frame.type_name.as_deref() {
            if !type_name.is_empty() {
                out.push_str(type_name);
                out.push('.');
            }
        }
    }
    out.push_str(&frame.method_name);
    if let Some(suffix) = rule.and_then(|rule| rule.suffix.as_deref()) {
        out.push_str(suffix);
    }
}

/// Flattens a leaf-first frame list into the root-first collapsed path,
/// prefixed with the thread name when one is known.
pub fn flatten_stack(
    thread_name: Option<&str>,
    frames: &[StackFrame],
    rules: &FrameRules,
) -> String {
    let mut out = String::with_capacity(16 * (frames.len() + 1));
    if let Some(name) = thread_name {
        out.push_str(name);
        out.push(';');
    }
    for (i, frame) in frames.iter().rev().enumerate() {
        if i > 0 {
            out.push(';');
        }
        push_frame(&mut out, frame, rules);
    }
    out
}
