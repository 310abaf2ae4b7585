use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::runtime::{Runtime, RuntimeError};
use crate::values::{KeyValue, Value, format_value, values_equal};

use super::util::{
    builtin, clamp_bound, expect_bool, expect_int, expect_list, expect_pair, expect_record,
    expect_text, list_value, record_value,
};

pub(super) fn register(env: &mut HashMap<String, Value>) {
    env.insert(
        "flatten".to_string(),
        builtin("flatten", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "flatten")?;
            let mut out = Vec::new();
            flatten_into(&list, &mut out);
            Ok(list_value(out))
        }),
    );

    env.insert(
        "unnest".to_string(),
        builtin("unnest", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "unnest")?;
            let mut out = Vec::new();
            for item in list.iter() {
                match item {
                    Value::List(inner) => out.extend(inner.iter().cloned()),
                    other => out.push(other.clone()),
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "aperture".to_string(),
        builtin("aperture", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "aperture")?;
            let n = expect_int(args.pop().unwrap(), "aperture")?;
            if n <= 0 {
                return Err(RuntimeError::Message(format!(
                    "aperture expects a positive Int, got {n}"
                )));
            }
            let n = n as usize;
            if n > list.len() {
                return Ok(list_value(Vec::new()));
            }
            Ok(list_value(
                list.windows(n)
                    .map(|window| list_value(window.to_vec()))
                    .collect(),
            ))
        }),
    );

    env.insert(
        "splitAt".to_string(),
        builtin("splitAt", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "splitAt")?;
            let idx = clamp_bound(expect_int(args.pop().unwrap(), "splitAt")?, list.len());
            Ok(Value::Tuple(vec![
                list_value(list[..idx].to_vec()),
                list_value(list[idx..].to_vec()),
            ]))
        }),
    );

    env.insert(
        "splitEvery".to_string(),
        builtin("splitEvery", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "splitEvery")?;
            let n = expect_int(args.pop().unwrap(), "splitEvery")?;
            if n <= 0 {
                return Err(RuntimeError::Message(format!(
                    "splitEvery expects a positive Int, got {n}"
                )));
            }
            Ok(list_value(
                list.chunks(n as usize)
                    .map(|chunk| list_value(chunk.to_vec()))
                    .collect(),
            ))
        }),
    );

    env.insert(
        "splitWhen".to_string(),
        builtin("splitWhen", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "splitWhen")?;
            let func = args.pop().unwrap();
            let mut idx = list.len();
            for (i, item) in list.iter().enumerate() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "splitWhen")? {
                    idx = i;
                    break;
                }
            }
            Ok(Value::Tuple(vec![
                list_value(list[..idx].to_vec()),
                list_value(list[idx..].to_vec()),
            ]))
        }),
    );

    env.insert(
        "partition".to_string(),
        builtin("partition", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "partition")?;
            let func = args.pop().unwrap();
            let mut yes = Vec::new();
            let mut no = Vec::new();
            for item in list.iter() {
                if expect_bool(runtime.apply(func.clone(), item.clone())?, "partition")? {
                    yes.push(item.clone());
                } else {
                    no.push(item.clone());
                }
            }
            Ok(Value::Tuple(vec![list_value(yes), list_value(no)]))
        }),
    );

    // Ragged rows are fine: shorter rows simply stop contributing.
    env.insert(
        "transpose".to_string(),
        builtin("transpose", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "transpose")?;
            let mut rows = Vec::with_capacity(list.len());
            for row in list.iter() {
                rows.push(expect_list(row.clone(), "transpose")?);
            }
            let mut out = Vec::new();
            let mut col = 0;
            loop {
                let column: Vec<Value> = rows
                    .iter()
                    .filter_map(|row| row.get(col).cloned())
                    .collect();
                if column.is_empty() {
                    break;
                }
                out.push(list_value(column));
                col += 1;
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "xprod".to_string(),
        builtin("xprod", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "xprod")?;
            let other = expect_list(args.pop().unwrap(), "xprod")?;
            let mut out = Vec::with_capacity(list.len() * other.len());
            for a in list.iter() {
                for b in other.iter() {
                    out.push(Value::Tuple(vec![a.clone(), b.clone()]));
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "zip".to_string(),
        builtin("zip", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "zip")?;
            let other = expect_list(args.pop().unwrap(), "zip")?;
            Ok(list_value(
                list.iter()
                    .zip(other.iter())
                    .map(|(a, b)| Value::Tuple(vec![a.clone(), b.clone()]))
                    .collect(),
            ))
        }),
    );

    env.insert(
        "zipWith".to_string(),
        builtin("zipWith", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "zipWith")?;
            let other = expect_list(args.pop().unwrap(), "zipWith")?;
            let func = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len().min(other.len()));
            for (a, b) in list.iter().zip(other.iter()) {
                out.push(runtime.call(func.clone(), vec![a.clone(), b.clone()])?);
            }
            Ok(list_value(out))
        }),
    );

    // Subject supplies the values, the argument supplies the keys.
    env.insert(
        "zipObj".to_string(),
        builtin("zipObj", 2, |mut args, _| {
            let values = expect_list(args.pop().unwrap(), "zipObj")?;
            let keys = expect_list(args.pop().unwrap(), "zipObj")?;
            let mut out = HashMap::new();
            for (key, value) in keys.iter().zip(values.iter()) {
                let key = expect_text(key.clone(), "zipObj")?;
                out.insert(key, value.clone());
            }
            Ok(record_value(out))
        }),
    );

    env.insert(
        "groupBy".to_string(),
        builtin("groupBy", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "groupBy")?;
            let func = args.pop().unwrap();
            let mut groups: HashMap<String, Vec<Value>> = HashMap::new();
            for item in list.iter() {
                let key = expect_text(runtime.apply(func.clone(), item.clone())?, "groupBy")?;
                groups.entry(key).or_default().push(item.clone());
            }
            Ok(record_value(
                groups
                    .into_iter()
                    .map(|(key, items)| (key, list_value(items)))
                    .collect(),
            ))
        }),
    );

    env.insert(
        "groupWith".to_string(),
        builtin("groupWith", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "groupWith")?;
            let func = args.pop().unwrap();
            let mut groups = Vec::new();
            let mut current: Vec<Value> = Vec::new();
            for item in list.iter() {
                if let Some(prev) = current.last() {
                    let same = expect_bool(
                        runtime.call(func.clone(), vec![prev.clone(), item.clone()])?,
                        "groupWith",
                    )?;
                    if !same {
                        groups.push(list_value(std::mem::take(&mut current)));
                    }
                }
                current.push(item.clone());
            }
            if !current.is_empty() {
                groups.push(list_value(current));
            }
            Ok(list_value(groups))
        }),
    );

    // Later elements win on key collisions.
    env.insert(
        "indexBy".to_string(),
        builtin("indexBy", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "indexBy")?;
            let func = args.pop().unwrap();
            let mut out = HashMap::new();
            for item in list.iter() {
                let key = expect_text(runtime.apply(func.clone(), item.clone())?, "indexBy")?;
                out.insert(key, item.clone());
            }
            Ok(record_value(out))
        }),
    );

    env.insert(
        "reduceBy".to_string(),
        builtin("reduceBy", 4, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "reduceBy")?;
            let key_func = args.pop().unwrap();
            let acc = args.pop().unwrap();
            let value_func = args.pop().unwrap();
            let mut out: HashMap<String, Value> = HashMap::new();
            for item in list.iter() {
                let key = expect_text(runtime.apply(key_func.clone(), item.clone())?, "reduceBy")?;
                let current = out.get(&key).cloned().unwrap_or_else(|| acc.clone());
                let next = runtime.call(value_func.clone(), vec![current, item.clone()])?;
                out.insert(key, next);
            }
            Ok(record_value(out))
        }),
    );

    env.insert(
        "fromPairs".to_string(),
        builtin("fromPairs", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "fromPairs")?;
            let mut out = HashMap::new();
            for item in list.iter() {
                let (key, value) = expect_pair(item.clone(), "fromPairs")?;
                out.insert(expect_text(key, "fromPairs")?, value);
            }
            Ok(record_value(out))
        }),
    );

    env.insert(
        "mergeAll".to_string(),
        builtin("mergeAll", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "mergeAll")?;
            let mut out = HashMap::new();
            for item in list.iter() {
                let fields = expect_record(item.clone(), "mergeAll")?;
                for (key, value) in fields.iter() {
                    out.insert(key.clone(), value.clone());
                }
            }
            Ok(record_value(out))
        }),
    );

    env.insert(
        "pluck".to_string(),
        builtin("pluck", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "pluck")?;
            let key = expect_text(args.pop().unwrap(), "pluck")?;
            let mut out = Vec::with_capacity(list.len());
            for item in list.iter() {
                let fields = expect_record(item.clone(), "pluck")?;
                let value = fields.get(&key).cloned().ok_or_else(|| {
                    RuntimeError::Message(format!("pluck expects records with a `{key}` field"))
                })?;
                out.push(value);
            }
            Ok(list_value(out))
        }),
    );

    // A `Reduced` constructor from the folding function stops the fold.
    env.insert(
        "reduce".to_string(),
        builtin("reduce", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "reduce")?;
            let mut acc = args.pop().unwrap();
            let func = args.pop().unwrap();
            for item in list.iter() {
                acc = runtime.call(func.clone(), vec![acc, item.clone()])?;
                if let Value::Constructor { name, args } = &acc {
                    if name == "Reduced" && args.len() == 1 {
                        return Ok(args[0].clone());
                    }
                }
            }
            Ok(acc)
        }),
    );

    env.insert(
        "reduced".to_string(),
        builtin("reduced", 1, |mut args, _| {
            Ok(Value::Constructor {
                name: "Reduced".to_string(),
                args: vec![args.pop().unwrap()],
            })
        }),
    );

    env.insert(
        "reduceRight".to_string(),
        builtin("reduceRight", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "reduceRight")?;
            let mut acc = args.pop().unwrap();
            let func = args.pop().unwrap();
            for item in list.iter().rev() {
                acc = runtime.call(func.clone(), vec![acc, item.clone()])?;
            }
            Ok(acc)
        }),
    );

    env.insert(
        "scan".to_string(),
        builtin("scan", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "scan")?;
            let mut acc = args.pop().unwrap();
            let func = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len() + 1);
            out.push(acc.clone());
            for item in list.iter() {
                acc = runtime.call(func.clone(), vec![acc, item.clone()])?;
                out.push(acc.clone());
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "mapAccum".to_string(),
        builtin("mapAccum", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "mapAccum")?;
            let mut acc = args.pop().unwrap();
            let func = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len());
            for item in list.iter() {
                let result = runtime.call(func.clone(), vec![acc, item.clone()])?;
                let (next, mapped) = expect_pair(result, "mapAccum")?;
                acc = next;
                out.push(mapped);
            }
            Ok(Value::Tuple(vec![acc, list_value(out)]))
        }),
    );

    env.insert(
        "mapAccumRight".to_string(),
        builtin("mapAccumRight", 3, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "mapAccumRight")?;
            let mut acc = args.pop().unwrap();
            let func = args.pop().unwrap();
            let mut out = Vec::with_capacity(list.len());
            for item in list.iter().rev() {
                let result = runtime.call(func.clone(), vec![acc, item.clone()])?;
                let (next, mapped) = expect_pair(result, "mapAccumRight")?;
                acc = next;
                out.push(mapped);
            }
            out.reverse();
            Ok(Value::Tuple(vec![acc, list_value(out)]))
        }),
    );

    // Subject is the seed. The step function returns `false` to stop or a
    // `(value, next seed)` pair to continue.
    env.insert(
        "unfold".to_string(),
        builtin("unfold", 2, |mut args, runtime| {
            let mut seed = args.pop().unwrap();
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            loop {
                match runtime.apply(func.clone(), seed)? {
                    Value::Bool(false) => break,
                    Value::Tuple(items) if items.len() == 2 => {
                        let mut items = items.into_iter();
                        out.push(items.next().unwrap());
                        seed = items.next().unwrap();
                    }
                    other => {
                        return Err(RuntimeError::Message(format!(
                            "unfold expects false or a (value, seed) pair, got {}",
                            format_value(&other)
                        )));
                    }
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "uniq".to_string(),
        builtin("uniq", 1, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "uniq")?;
            let mut out: Vec<Value> = Vec::new();
            let mut seen = HashSet::new();
            for item in list.iter() {
                let fresh = match KeyValue::try_from_value(item) {
                    Some(key) => seen.insert(key),
                    None => !out.iter().any(|kept| values_equal(kept, item)),
                };
                if fresh {
                    out.push(item.clone());
                }
            }
            Ok(list_value(out))
        }),
    );

    // First item wins when two elements project to the same key.
    env.insert(
        "uniqBy".to_string(),
        builtin("uniqBy", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "uniqBy")?;
            let func = args.pop().unwrap();
            let mut out = Vec::new();
            let mut seen = HashSet::new();
            let mut slow_keys: Vec<Value> = Vec::new();
            for item in list.iter() {
                let key = runtime.apply(func.clone(), item.clone())?;
                let fresh = match KeyValue::try_from_value(&key) {
                    Some(key) => seen.insert(key),
                    None => {
                        let fresh = !slow_keys.iter().any(|kept| values_equal(kept, &key));
                        if fresh {
                            slow_keys.push(key);
                        }
                        fresh
                    }
                };
                if fresh {
                    out.push(item.clone());
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "uniqWith".to_string(),
        builtin("uniqWith", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "uniqWith")?;
            let func = args.pop().unwrap();
            let mut out: Vec<Value> = Vec::new();
            for item in list.iter() {
                let mut dup = false;
                for kept in &out {
                    if expect_bool(
                        runtime.call(func.clone(), vec![kept.clone(), item.clone()])?,
                        "uniqWith",
                    )? {
                        dup = true;
                        break;
                    }
                }
                if !dup {
                    out.push(item.clone());
                }
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "without".to_string(),
        builtin("without", 2, |mut args, _| {
            let list = expect_list(args.pop().unwrap(), "without")?;
            let excluded = expect_list(args.pop().unwrap(), "without")?;
            Ok(list_value(
                list.iter()
                    .filter(|item| !excluded.iter().any(|ex| values_equal(ex, item)))
                    .cloned()
                    .collect(),
            ))
        }),
    );

    // Insertion sort keeps the comparator's error path open and the sort
    // stable; the comparator returns a negative, zero, or positive Int.
    env.insert(
        "sort".to_string(),
        builtin("sort", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "sort")?;
            let func = args.pop().unwrap();
            let mut out: Vec<Value> = Vec::with_capacity(list.len());
            for item in list.iter() {
                let mut idx = out.len();
                while idx > 0 {
                    let ord = expect_int(
                        runtime.call(func.clone(), vec![item.clone(), out[idx - 1].clone()])?,
                        "sort",
                    )?;
                    if ord < 0 {
                        idx -= 1;
                    } else {
                        break;
                    }
                }
                out.insert(idx, item.clone());
            }
            Ok(list_value(out))
        }),
    );

    env.insert(
        "sortBy".to_string(),
        builtin("sortBy", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "sortBy")?;
            let func = args.pop().unwrap();
            let mut pairs = Vec::with_capacity(list.len());
            for item in list.iter() {
                let key = runtime.apply(func.clone(), item.clone())?;
                let key = KeyValue::try_from_value(&key).ok_or_else(|| {
                    RuntimeError::Message(format!(
                        "sortBy expects an orderable key, got {}",
                        format_value(&key)
                    ))
                })?;
                pairs.push((key, item.clone()));
            }
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(list_value(pairs.into_iter().map(|(_, item)| item).collect()))
        }),
    );

    env.insert(
        "sortWith".to_string(),
        builtin("sortWith", 2, |mut args, runtime| {
            let list = expect_list(args.pop().unwrap(), "sortWith")?;
            let comparators = expect_list(args.pop().unwrap(), "sortWith")?;
            let mut out: Vec<Value> = Vec::with_capacity(list.len());
            for item in list.iter() {
                let mut idx = out.len();
                while idx > 0 {
                    let ord = compare_with(runtime, &comparators, item, &out[idx - 1])?;
                    if ord == Ordering::Less {
                        idx -= 1;
                    } else {
                        break;
                    }
                }
                out.insert(idx, item.clone());
            }
            Ok(list_value(out))
        }),
    );
}

fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::List(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

fn compare_with(
    runtime: &mut Runtime,
    comparators: &[Value],
    left: &Value,
    right: &Value,
) -> Result<Ordering, RuntimeError> {
    for comparator in comparators {
        let ord = expect_int(
            runtime.call(comparator.clone(), vec![left.clone(), right.clone()])?,
            "sortWith",
        )?;
        match ord.cmp(&0) {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }
    Ok(Ordering::Equal)
}
