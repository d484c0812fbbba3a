use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Join two url path
pub fn join(base: &str, other: &str) -> String {
    let be = base.ends_with('/');
    let os = other.starts_with('/');
    if be && os {
        return format!("{}{}", base, &other[1..]);
    }

    if !be && !os {
        return format!("{}/{}", base, other);
    }

    format!("{}{}", base, other)
}

/// bytes escaped inside one path segment, `/` included
const PATH_SEGMENT: &AsciiSet =
    &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>').add(b'`').add(b'?').add(b'{').add(b'}').add(b'/').add(b'%');

/// Percent encode one path segment, so ids coming from the browser can not
/// add segments to downstream urls. A space becomes `%20`, never `+`, so the
/// router decodes the segment back to the same value.
pub fn encode_segment(val: &str) -> String {
    utf8_percent_encode(val, PATH_SEGMENT).to_string()
}
