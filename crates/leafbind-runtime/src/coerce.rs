//! ECMAScript type conversions over the heap
//!
//! Class instances have no primitive form: converting one to a number or a
//! string fails.

use leafbind_sdk::{BindResult, BindingError, JsValue, ObjectRef};

use crate::heap::{Heap, ObjectKind};

/// ToNumber
pub fn to_number(heap: &Heap, value: JsValue) -> BindResult<f64> {
    if let Some(n) = value.as_number() {
        return Ok(n);
    }
    if let Some(b) = value.as_bool() {
        return Ok(if b { 1.0 } else { 0.0 });
    }
    if value.is_null() {
        return Ok(0.0);
    }
    if value.is_undefined() {
        return Ok(f64::NAN);
    }
    if let Some(s) = value.as_string() {
        return Ok(string_to_number(&heap.string(s)?));
    }
    match value.as_object() {
        Some(obj) => {
            let text = object_to_string(heap, obj, &mut Vec::new())?;
            Ok(string_to_number(&text))
        }
        None => Ok(f64::NAN),
    }
}

/// ToInt32: ToNumber, then truncation modulo 2^32
pub fn to_int32(heap: &Heap, value: JsValue) -> BindResult<i32> {
    if let Some(i) = value.as_int32() {
        return Ok(i);
    }
    Ok(number_to_int32(to_number(heap, value)?))
}

/// ToBoolean
pub fn to_boolean(heap: &Heap, value: JsValue) -> bool {
    if let Some(b) = value.as_bool() {
        return b;
    }
    if let Some(i) = value.as_int32() {
        return i != 0;
    }
    if let Some(d) = value.as_double() {
        return d != 0.0 && !d.is_nan();
    }
    if let Some(s) = value.as_string() {
        return heap.string(s).map(|t| !t.is_empty()).unwrap_or(false);
    }
    value.is_object()
}

/// ToString, returning the text
pub fn to_string(heap: &Heap, value: JsValue) -> BindResult<String> {
    if let Some(s) = value.as_string() {
        return Ok(heap.string(s)?.to_string());
    }
    if let Some(i) = value.as_int32() {
        return Ok(i.to_string());
    }
    if let Some(d) = value.as_double() {
        return Ok(number_to_string(d));
    }
    if let Some(b) = value.as_bool() {
        return Ok(b.to_string());
    }
    if value.is_null() {
        return Ok("null".to_string());
    }
    match value.as_object() {
        Some(obj) => object_to_string(heap, obj, &mut Vec::new()),
        None => Ok("undefined".to_string()),
    }
}

fn object_to_string(heap: &Heap, obj: ObjectRef, seen: &mut Vec<ObjectRef>) -> BindResult<String> {
    let data = heap.object(obj)?;
    match &data.kind {
        ObjectKind::Plain => Ok("[object Object]".to_string()),
        ObjectKind::Function(f) => Ok(format!(
            "function {}() {{ [native code] }}",
            f.descriptor.name()
        )),
        ObjectKind::Instance { .. } => Err(BindingError::Runtime(
            "cannot convert class instance to primitive".to_string(),
        )),
        ObjectKind::Array(items) => {
            // Cyclic arrays join as empty
            if seen.contains(&obj) {
                return Ok(String::new());
            }
            seen.push(obj);
            let mut parts = Vec::with_capacity(items.len());
            for &item in items {
                if item.is_nullish() {
                    parts.push(String::new());
                } else if let Some(inner) = item.as_object() {
                    parts.push(object_to_string(heap, inner, seen)?);
                } else {
                    parts.push(to_string(heap, item)?);
                }
            }
            seen.pop();
            Ok(parts.join(","))
        }
    }
}

/// StringToNumber
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    let radix = match t.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return match u64::from_str_radix(&t[2..], radix) {
            Ok(n) => n as f64,
            Err(_) => f64::NAN,
        };
    }
    match t {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            // Rust accepts "inf"/"nan" spellings that scripts do not
            if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
                f64::NAN
            } else {
                t.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    }
}

/// Number::toString for finite and non-finite doubles
pub fn number_to_string(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if d == 0.0 {
        return "0".to_string();
    }
    let abs = d.abs();
    if (1e-6..1e21).contains(&abs) {
        if d.fract() == 0.0 {
            format!("{:.0}", d)
        } else {
            format!("{}", d)
        }
    } else {
        let formatted = format!("{:e}", d);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    }
}

/// ToInt32 on an already converted number
pub fn number_to_int32(d: f64) -> i32 {
    if !d.is_finite() {
        return 0;
    }
    let modulus = 4_294_967_296.0_f64;
    let mut n = d.trunc() % modulus;
    if n < 0.0 {
        n += modulus;
    }
    if n >= 2_147_483_648.0 {
        n -= modulus;
    }
    n as i32
}
