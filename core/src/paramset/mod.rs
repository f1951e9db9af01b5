//! Parameter Sets

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;

/// Stores a list of values for a named parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,
}

impl<T> ParamSetItem<T> {
    /// Returns a new `ParamSetItem`.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub point3fs: ParamSetMap<Point3f>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            self.$paramset
                .insert(String::from(name), ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for removing
/// parameter set item.
macro_rules! paramset_erase {
    ($func: ident, $paramset: ident) => {
        pub fn $func(&mut self, name: &str) -> bool {
            self.$paramset.remove(name).is_some()
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => param.values[0].clone(),
                _ => default,
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            match self.$paramset.get(name) {
                Some(param) => param.values.clone(),
                None => vec![],
            }
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        let mut names: Vec<&String> = $params.keys().collect();
        names.sort();
        for name in names {
            let values = &$params[name].values;
            write!($formatter, "\"{} {}\" [", $param_type, name)?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!($formatter, " ")?;
                }
                write!($formatter, "{}", v)?;
            }
            writeln!($formatter, "]")?;
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_erase!(erase_int, ints);
    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_erase!(erase_bool, bools);
    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_erase!(erase_float, floats);
    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_erase!(erase_point3f, point3fs);
    paramset_find_one!(find_one_point3f, Point3f, point3fs);
    paramset_find!(find_point3f, Point3f, point3fs);
    paramset_add!(add_point3f, Point3f, point3fs);

    paramset_erase!(erase_string, strings);
    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_erase!(erase_spectrum, spectra);
    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice. Trailing values that do not
    ///              form a full triple are ignored.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!("RGB spectrum '{name}' has {} values. Ignoring extras.", values.len());
        }
        let spectra = values
            .chunks_exact(3)
            .map(|c| Spectrum::rgb(c[0], c[1], c[2]))
            .collect();
        self.spectra
            .insert(String::from(name), ParamSetItem::new(spectra));
    }

    /// Clear all parameter set items.
    pub fn clear(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.floats.clear();
        self.point3fs.clear();
        self.spectra.clear();
        self.strings.clear();
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.point3fs, "point3", f);
        display_param!(self.spectra, "color", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_falls_back_to_default() {
        let mut ps = ParamSet::new();
        ps.add_int("maxdepth", &[7]);
        ps.add_float("cropwindow", &[0.0, 1.0, 0.0, 1.0]);

        assert_eq!(ps.find_one_int("maxdepth", 5), 7);
        assert_eq!(ps.find_one_int("missing", 5), 5);
        // Lists are not single values.
        assert_eq!(ps.find_one_float("cropwindow", 2.0), 2.0);
        assert_eq!(ps.find_float("cropwindow").len(), 4);

        assert!(ps.erase_int("maxdepth"));
        assert!(!ps.erase_int("maxdepth"));
        assert_eq!(ps.find_one_int("maxdepth", 5), 5);
    }

    #[test]
    fn rgb_spectrum_groups_triples() {
        let mut ps = ParamSet::new();
        ps.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let kd = ps.find_spectrum("Kd");
        assert_eq!(kd.len(), 2);
        assert_eq!(kd[1], Spectrum::rgb(0.4, 0.5, 0.6));
    }

    #[test]
    fn display_lists_parameters_by_type() {
        let mut ps = ParamSet::new();
        ps.add_bool("ignoreDistanceToCamera", &[true]);
        ps.add_string("filename", &[String::from("out.ti")]);
        let s = ps.to_string();
        assert!(s.contains("\"bool ignoreDistanceToCamera\" [true]"));
        assert!(s.contains("\"string filename\" [out.ti]"));
    }
}
