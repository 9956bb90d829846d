use super::Mapper;

impl Mapper {
    /// Moves the cursor by `delta` rows.
    ///
    /// Moving past either end leaves the loaded rows in place and makes the
    /// mapper dry, with a fresh draft row. Moving back into range, or
    /// calling [`Mapper::first`]/[`Mapper::last`], selects a row again.
    pub fn skip(&mut self, delta: isize) -> &mut Self {
        let was_valid = self.valid();
        self.cursor = self.cursor.saturating_add(delta);

        if was_valid && self.dry() {
            self.draft = self.template.clone();
        }
        self
    }

    pub fn first(&mut self) -> &mut Self {
        self.cursor = 0;
        self
    }

    pub fn last(&mut self) -> &mut Self {
        self.cursor = self.rows.len() as isize - 1;
        self
    }

    pub fn next(&mut self) -> &mut Self {
        self.skip(1)
    }

    pub fn prev(&mut self) -> &mut Self {
        self.skip(-1)
    }
}
