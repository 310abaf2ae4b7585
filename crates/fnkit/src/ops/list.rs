use std::collections::HashMap;

use crate::runtime::RuntimeError;
use crate::values::{Value, format_value, values_equal};

use super::util::{
    builtin, clamp_bound, clamp_count, expect_bool, expect_int, expect_list, expect_text,
    list_value, make_none, make_some, resolve_index,
};

pub(super) fn register(env: &mut HashMap<String, Value>) {
    env.insert(
        "append".to_string(),
        builtin("append", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "append")?;
            let el = args.pop().unwrap();
            let mut out = (*list).clone();
            out.push(el);
            Ok(list_value(out))
        }),
    );

    env.insert(
        "prepend".to_string(),
        builtin("prepend", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "prepend")?;
            let el = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len() + 1);
            out.push(el);
            out.extend(list.iter().cloned());
            Ok(list_value(out))
        }),
    );

    env.insert(
        "concat".to_string(),
        builtin("concat", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "concat")?;
            let other = expect_list(args.pop().unwrap(), "concat")?;
            let mut out = (*list).clone();
            out.extend(other.iter().cloned());
            Ok(list_value(out))
        }),
    );

    env.insert(
        "head".to_string(),
        builtin("head", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "head")?;
            Ok(list.first().cloned().map_or_else(make_none, make_some))
        }),
    );

    env.insert(
        "last".to_string(),
        builtin("last", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "last")?;
            Ok(list.last().cloned().map_or_else(make_none, make_some))
        }),
    );

    env.insert(
        "init".to_string(),
        builtin("init", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "init")?;
            let end = list.len().saturating_sub(1);
            Ok(list_value(list[..end].to_vec()))
        }),
    );

    env.insert(
        "tail".to_string(),
        builtin("tail", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "tail")?;
            Ok(list_value(list.iter().skip(1).cloned().collect()))
        }),
    );

    env.insert(
        "nth".to_string(),
        builtin("nth", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "nth")?;
            let n = expect_int(args.pop().unwrap(), "nth")?;
            Ok(match resolve_index(n, list.len()) {
                Some(idx) => make_some(list[idx].clone()),
                None => make_none(),
            })
        }),
    );

    env.insert(
        "take".to_string(),
        builtin("take", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "take")?;
            let n = clamp_count(expect_int(args.pop().unwrap(), "take")?, list.len());
            Ok(list_value(list[..n].to_vec()))
        }),
    );

    env.insert(
        "takeLast".to_string(),
        builtin("takeLast", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "takeLast")?;
            let n = clamp_count(expect_int(args.pop().unwrap(), "takeLast")?, list.len());
            Ok(list_value(list[list.len() - n..].to_vec()))
        }),
    );

    env.insert(
        "drop".to_string(),
        builtin("drop", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "drop")?;
            let n = clamp_count(expect_int(args.pop().unwrap(), "drop")?, list.len());
            Ok(list_value(list[n..].to_vec()))
        }),
    );

    env.insert(
        "dropLast".to_string(),
        builtin("dropLast", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "dropLast")?;
            let n = clamp_count(expect_int(args.pop().unwrap(), "dropLast")?, list.len());
            Ok(list_value(list[..list.len() - n].to_vec()))
        }),
    );

    env.insert(
        "slice".to_string(),
        builtin("slice", 3, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "slice")?;
            let to = clamp_bound(expect_int(args.pop().unwrap(), "slice")?, list.len());
            let from = clamp_bound(expect_int(args.pop().unwrap(), "slice")?, list.len());
            if from >= to {
                return Ok(list_value(Vec::new()));
            }
            Ok(list_value(list[from..to].to_vec()))
        }),
    );

    env.insert(
        "reverse".to_string(),
        builtin("reverse", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "reverse")?;
            Ok(list_value(list.iter().rev().cloned().collect()))
        }),
    );

    env.insert(
        "insert".to_string(),
        builtin("insert", 3, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "insert")?;
            let el = args.pop().unwrap();
            let idx = clamp_bound(expect_int(args.pop().unwrap(), "insert")?, list.len());
            let mut out = (*list).clone();
            out.insert(idx, el);
            Ok(list_value(out))
        }),
    );

    env.insert(
        "insertAll".to_string(),
        builtin("insertAll", 3, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "insertAll")?;
            let els = expect_list(args.pop().unwrap(), "insertAll")?;
            let idx = clamp_bound(expect_int(args.pop().unwrap(), "insertAll")?, list.len());
            let mut out = Vec::with_capacity(list.len() + els.len());
            out.extend(list[..idx].iter().cloned());
            out.extend(els.iter().cloned());
            out.extend(list[idx..].iter().cloned());
            Ok(list_value(out))
        }),
    );

    env.insert(
        "remove".to_string(),
        builtin("remove", 3, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "remove")?;
            let count = expect_int(args.pop().unwrap(), "remove")?;
            let start = clamp_bound(expect_int(args.pop().unwrap(), "remove")?, list.len());
            let end = (start + clamp_count(count, list.len())).min(list.len());
            let mut out = (*list).clone();
            out.drain(start..end);
            Ok(list_value(out))
        }),
    );

    // Out-of-range indices leave the list untouched, matching `adjust`.
    env.insert(
        "update".to_string(),
        builtin("update", 3, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "update")?;
            let el = args.pop().unwrap();
            let idx = expect_int(args.pop().unwrap(), "update")?;
            let mut out = (*list).clone();
            if let Some(idx) = resolve_index(idx, out.len()) {
                out[idx] = el;
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "adjust".to_string(),
        builtin("adjust", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "adjust")?;
            let idx = expect_int(args.pop().unwrap(), "adjust")?;
            let func = args.pop().unwrap();
            let mut out = (*list).clone();
            if let Some(idx) = resolve_index(idx, out.len()) {
                out[idx] = runtime.apply(func, out[idx].clone())?;
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "intersperse".to_string(),
        builtin("intersperse", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "intersperse")?;
            let sep = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter() {
                if !out.is_empty() {
                    out.push(sep.clone());
                }
                out.push(item.clone());
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "join".to_string(),
        builtin("join", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "join")?;
            let sep = expect_text(args.pop().unwrap(), "join")?;
            let parts: Vec<String> = list.iter().map(format_value).collect();
            Ok(Value::Text(parts.join(&sep)))
        }),
    );

    // Subject is the element to repeat, not a list.
    env.insert(
        "repeat".to_string(),
        builtin("repeat", 2, |mut args, _| {
            let el = args.pop().unwrap();
            let n = expect_int(args.pop().unwrap(), "repeat")?;
            let n = n.max(0) as usize;
            Ok(list_value(vec![el; n]))
        }),
    );

    env.insert(
        "pair".to_string(),
        builtin("pair", 2, |mut args, _| {
            let fst = args.pop().unwrap();
            let snd = args.pop().unwrap();
            Ok(list_value(vec![fst, snd]))
        }),
    );

    env.insert(
        "contains".to_string(),
        builtin("contains", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "contains")?;
            let el = args.pop().unwrap();
            Ok(Value::Bool(list.iter().any(|v| values_equal(v, &el))))
        }),
    );

    env.insert(
        "indexOf".to_string(),
        builtin("indexOf", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "indexOf")?;
            let el = args.pop().unwrap();
            Ok(list
                .iter()
                .position(|v| values_equal(v, &el))
                .map_or_else(make_none, |idx| make_some(Value::Int(idx as i64))))
        }),
    );

    env.insert(
        "lastIndexOf".to_string(),
        builtin("lastIndexOf", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "lastIndexOf")?;
            let el = args.pop().unwrap();
            Ok(list
                .iter()
                .rposition(|v| values_equal(v, &el))
                .map_or_else(make_none, |idx| make_some(Value::Int(idx as i64))))
        }),
    );

    // A list prefix compares element-wise; anything else is a one-element prefix.
    env.insert(
        "startsWith".to_string(),
        builtin("startsWith", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "startsWith")?;
            let prefix = match args.pop().unwrap() {
                Value::List(items) => items,
                single => std::sync::Arc::new(vec![single]),
            };
            let matches = prefix.len() <= list.len()
                && prefix
                    .iter()
                    .zip(list.iter())
                    .all(|(a, b)| values_equal(a, b));
            Ok(Value::Bool(matches))
        }),
    );

    env.insert(
        "all".to_string(),
        builtin("all", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "all")?;
            let func = args.pop().unwrap();
            for item in list.iter() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "all")? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }),
    );

    env.insert(
        "any".to_string(),
        builtin("any", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "any")?;
            let func = args.pop().unwrap();
            for item in list.iter() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "any")? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }),
    );

    env.insert(
        "none".to_string(),
        builtin("none", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "none")?;
            let func = args.pop().unwrap();
            for item in list.iter() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "none")? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }),
    );

    env.insert(
        "find".to_string(),
        builtin("find", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "find")?;
            let func = args.pop().unwrap();
            for item in list.iter() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "find")? {
                    return Ok(make_some(item.clone()));
                }
            }
            Ok(make_none())
        }),
    );

    env.insert(
        "findIndex".to_string(),
        builtin("findIndex", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "findIndex")?;
            let func = args.pop().unwrap();
            for (idx, item) in list.iter().enumerate() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "findIndex")? {
                    return Ok(make_some(Value::Int(idx as i64)));
                }
            }
            Ok(make_none())
        }),
    );

    env.insert(
        "findLast".to_string(),
        builtin("findLast", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "findLast")?;
            let func = args.pop().unwrap();
            for item in list.iter().rev() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "findLast")? {
                    return Ok(make_some(item.clone()));
                }
            }
            Ok(make_none())
        }),
    );

    env.insert(
        "findLastIndex".to_string(),
        builtin("findLastIndex", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "findLastIndex")?;
            let func = args.pop().unwrap();
            for (idx, item) in list.iter().enumerate().rev() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "findLastIndex")? {
                    return Ok(make_some(Value::Int(idx as i64)));
                }
            }
            Ok(make_none())
        }),
    );

    env.insert(
        "filter".to_string(),
        builtin("filter", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "filter")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "filter")? {
                    out.push(item.clone());
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "reject".to_string(),
        builtin("reject", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "reject")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "reject")? {
                    out.push(item.clone());
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "takeWhile".to_string(),
        builtin("takeWhile", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "takeWhile")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "takeWhile")? {
                    break;
                }
                out.push(item.clone());
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "takeLastWhile".to_string(),
        builtin("takeLastWhile", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "takeLastWhile")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter().rev() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "takeLastWhile")? {
                    break;
                }
                out.push(item.clone());
            }
            out.reverse();
            Ok(list_value(out))
        }),
    );

    env.insert(
        "dropWhile".to_string(),
        builtin("dropWhile", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "dropWhile")?;
            let func = args.pop().unwrap();
            let mut start = list.len();
            for (idx, item) in list.iter().enumerate() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "dropWhile")? {
                    start = idx;
                    break;
                }
            }
            Ok(list_value(list[start..].to_vec()))
        }),
    );

    env.insert(
        "dropLastWhile".to_string(),
        builtin("dropLastWhile", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "dropLastWhile")?;
            let func = args.pop().unwrap();
            let mut end = 0;
            for (idx, item) in list.iter().enumerate().rev() {
                if !expect_bool(runtime.apply(func.clone(), item.clone())?, "dropLastWhile")? {
                    end = idx + 1;
                    break;
                }
            }
            Ok(list_value(list[..end].to_vec()))
        }),
    );

    env.insert(
        "map".to_string(),
        builtin("map", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "map")?;
            let func = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len());
            for item in list.iter() {
                out.push(runtime.apply(func.clone(), item.clone())?);
            }
            Ok(list_value(out))
        }),
    );

    // Applies the function for its effects and hands the list back.
    env.insert(
        "forEach".to_string(),
        builtin("forEach", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "forEach")?;
            let func = args.pop().unwrap();
            for item in list.iter() {
                runtime.apply(func.clone(), item.clone())?;
            }
            Ok(Value::List(list))
        }),
    );

    env.insert(
        "chain".to_string(),
        builtin("chain", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "chain")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            for item in list.iter() {
                let mapped = runtime.apply(func.clone(), item.clone())?;
                let items = match mapped {
                    Value::List(items) => items,
                    other => {
                        return Err(RuntimeError::Message(format!(
                            "chain expects the function to return List, got {}",
                            format_value(&other)
                        )));
                    }
                };
                out.extend(items.iter().cloned());
            }
            Ok(list_value(out))
        }),
    );
}
