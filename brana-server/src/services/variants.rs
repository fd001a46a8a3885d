//! Variant generator
//!
//! 由属性选项的笛卡尔积生成商品变体 (Size × Color ...)。

use shared::models::{ProductVariant, VariantAttribute};
use std::collections::BTreeMap;

/// Separator between option values in a variant name
pub const VARIANT_NAME_SEPARATOR: &str = " / ";

/// Trimmed, non-blank, first-occurrence-unique options; `None` when nothing is left
fn clean_attribute(attr: &VariantAttribute) -> Option<(String, Vec<String>)> {
    let mut options: Vec<String> = Vec::with_capacity(attr.options.len());
    for opt in &attr.options {
        let opt = opt.trim();
        if !opt.is_empty() && !options.iter().any(|o| o == opt) {
            options.push(opt.to_string());
        }
    }
    if options.is_empty() {
        return None;
    }
    Some((attr.name.trim().to_string(), options))
}

/// Generate every option combination
///
/// Attributes keep their order and the last one varies fastest. Each variant
/// carries the base price and stock and no images.
pub fn generate_variants(
    attributes: &[VariantAttribute],
    base_price: f64,
    base_stock: i64,
) -> Vec<ProductVariant> {
    let attrs: Vec<(String, Vec<String>)> =
        attributes.iter().filter_map(clean_attribute).collect();
    if attrs.is_empty() {
        return Vec::new();
    }

    let total: usize = attrs.iter().map(|(_, opts)| opts.len()).product();
    let mut variants = Vec::with_capacity(total);
    // 混合进制计数器，末位进位最快
    let mut indices = vec![0usize; attrs.len()];

    for _ in 0..total {
        let mut values = Vec::with_capacity(attrs.len());
        let mut map = BTreeMap::new();
        for ((name, options), &i) in attrs.iter().zip(&indices) {
            values.push(options[i].as_str());
            map.insert(name.clone(), options[i].clone());
        }

        variants.push(ProductVariant {
            name: values.join(VARIANT_NAME_SEPARATOR),
            attributes: map,
            price: base_price,
            stock: base_stock,
            images: Vec::new(),
        });

        for pos in (0..indices.len()).rev() {
            indices[pos] += 1;
            if indices[pos] < attrs[pos].1.len() {
                break;
            }
            indices[pos] = 0;
        }
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn attr(name: &str, options: &[&str]) -> VariantAttribute {
        VariantAttribute {
            name: name.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_cartesian_count_and_unique_names() {
        let attrs = vec![
            attr("Size", &["S", "M", "L"]),
            attr("Color", &["Red", "Blue"]),
            attr("Sleeve", &["Short", "Long"]),
        ];
        let variants = generate_variants(&attrs, 4500.0, 3);
        assert_eq!(variants.len(), 12);

        let names: HashSet<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names.len(), 12);
        assert!(variants.iter().all(|v| v.price == 4500.0 && v.stock == 3));
        assert!(variants.iter().all(|v| v.images.is_empty()));
    }

    #[test]
    fn test_last_attribute_varies_fastest() {
        let attrs = vec![attr("Size", &["S", "M"]), attr("Color", &["Red", "Blue"])];
        let names: Vec<String> = generate_variants(&attrs, 1.0, 1)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["S / Red", "S / Blue", "M / Red", "M / Blue"]);
    }

    #[test]
    fn test_attribute_map() {
        let attrs = vec![attr("Size", &["S"]), attr("Color", &["Red"])];
        let v = &generate_variants(&attrs, 1.0, 1)[0];
        assert_eq!(v.attributes.get("Size").map(String::as_str), Some("S"));
        assert_eq!(v.attributes.get("Color").map(String::as_str), Some("Red"));
    }

    #[test]
    fn test_options_cleaned() {
        let attrs = vec![
            attr("Size", &[" S ", "S", "", "M"]),
            attr("Empty", &["", "  "]),
        ];
        let names: Vec<String> = generate_variants(&attrs, 1.0, 1)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["S", "M"]);
    }

    #[test]
    fn test_no_attributes() {
        assert!(generate_variants(&[], 1.0, 1).is_empty());
        assert!(generate_variants(&[attr("Size", &[])], 1.0, 1).is_empty());
    }
}
