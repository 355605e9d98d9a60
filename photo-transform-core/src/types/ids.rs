//! Element id scheme of the rendered form.
//!
//! - `<qualifier>`: qualifier checkbox
//! - `<p>_div`: command selector plus detail box
//! - `<p>_value`: command selector (`select` for lists, `ul` for radio groups)
//! - `<p>_det`: detail box, rebuilt on every command change
//!
//! Detail controls are numbered by a per-render counter `n`.

/// Fixed ids of one qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierIds {
    pub checkbox: String,
    pub prefix: String,
    pub div: String,
    pub value: String,
    pub det: String,
}

impl QualifierIds {
    pub fn new(name: &str, prefix: &str) -> Self {
        Self {
            checkbox: name.to_string(),
            prefix: prefix.to_string(),
            div: format!("{prefix}_div"),
            value: format!("{prefix}_value"),
            det: format!("{prefix}_det"),
        }
    }

    pub fn list(&self, n: usize) -> String {
        format!("{}_ds{n}", self.prefix)
    }

    pub fn number(&self, n: usize) -> String {
        format!("{}_di{n}", self.prefix)
    }

    pub fn color(&self, n: usize) -> String {
        format!("{}_dc{n}", self.prefix)
    }

    /// Wrapper of a detail-level radio group.
    pub fn radio_group(&self, n: usize) -> String {
        format!("{}r_radio{n}", self.prefix)
    }

    /// Shared `name` of a radio group; `n == 0` is the qualifier-level selector.
    pub fn radio_name(&self, n: usize) -> String {
        if n == 0 {
            format!("{}_radio", self.prefix)
        } else {
            self.radio_group(n)
        }
    }

    /// Radio input `k` of group `n`.
    pub fn radio_input(&self, n: usize, k: usize) -> String {
        if n == 0 {
            format!("{}r_{k}", self.prefix)
        } else {
            format!("{}r{n}_{k}", self.prefix)
        }
    }

    /// Panel shown while radio input `radio_id` is checked.
    pub fn panel(radio_id: &str) -> String {
        format!("{radio_id}d")
    }

    /// Title paragraph for the control `code<n>` (`ds`, `di`, `dc`).
    pub fn title(&self, code: &str, n: usize) -> String {
        format!("{}p_{code}{n}", self.prefix)
    }

    /// Hover wrapper of a described radio branch.
    pub fn branch_item(&self, n: usize, k: usize) -> String {
        format!("{}_li{n}_{k}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ids() {
        let ids = QualifierIds::new("crop", "c");
        assert_eq!(ids.checkbox, "crop");
        assert_eq!(ids.div, "c_div");
        assert_eq!(ids.value, "c_value");
        assert_eq!(ids.det, "c_det");
    }

    #[test]
    fn test_detail_ids() {
        let ids = QualifierIds::new("effect", "e");
        assert_eq!(ids.list(1), "e_ds1");
        assert_eq!(ids.number(2), "e_di2");
        assert_eq!(ids.color(3), "e_dc3");
        assert_eq!(ids.title("di", 2), "ep_di2");
        assert_eq!(ids.radio_group(4), "er_radio4");
        assert_eq!(ids.radio_input(0, 1), "er_1");
        assert_eq!(ids.radio_input(4, 1), "er4_1");
        assert_eq!(QualifierIds::panel("er4_1"), "er4_1d");
        assert_eq!(ids.radio_name(0), "e_radio");
    }
}
