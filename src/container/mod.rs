//! Experiment container and cross-entity linkage rules
//!
//! A container holds all instances and the shared electrode table for one
//! recording session. Excitation waveforms live in the stimulus area; raw
//! and background-subtracted responses live in the acquisition area, which
//! shares one name scope.
//!
//! Links are attached by name and verified twice: when an instance is added,
//! and again by [`Container::validate`] after a round trip, when persisted
//! references must re-resolve against the reloaded object graph. A reload
//! that produces an unresolved or dimensionally inconsistent link is an
//! error, never a silent success.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::series::{
    BackgroundSubtractedSeries, ElectrodeRegion, ElectrodeTable, ExcitationSeries, Link,
    ResponseSeries,
};

/// A type that links inside a container can resolve to.
pub trait LinkTarget: Sized {
    /// Schema type name, used in error reporting.
    const TYPE_NAME: &'static str;

    /// Find the instance with the given name in its container area.
    fn lookup<'a>(container: &'a Container, name: &str) -> Option<&'a Self>;
}

impl LinkTarget for ExcitationSeries {
    const TYPE_NAME: &'static str = crate::schema::EXCITATION_SERIES;

    fn lookup<'a>(container: &'a Container, name: &str) -> Option<&'a Self> {
        container.stimulus.get(name)
    }
}

impl LinkTarget for ResponseSeries {
    const TYPE_NAME: &'static str = crate::schema::RESPONSE_SERIES;

    fn lookup<'a>(container: &'a Container, name: &str) -> Option<&'a Self> {
        container.responses.get(name)
    }
}

/// The persisted unit holding all instances of one FSCV session.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    session_description: String,
    session_start_time: DateTime<Utc>,
    electrodes: ElectrodeTable,
    stimulus: BTreeMap<String, ExcitationSeries>,
    responses: BTreeMap<String, ResponseSeries>,
    background: BTreeMap<String, BackgroundSubtractedSeries>,
}

impl Container {
    /// Create an empty container for a session.
    #[must_use]
    pub fn new(session_description: impl Into<String>, session_start_time: DateTime<Utc>) -> Self {
        Self {
            session_description: session_description.into(),
            session_start_time,
            electrodes: ElectrodeTable::new(),
            stimulus: BTreeMap::new(),
            responses: BTreeMap::new(),
            background: BTreeMap::new(),
        }
    }

    /// Session description.
    #[must_use]
    pub fn session_description(&self) -> &str {
        &self.session_description
    }

    /// Session start time.
    #[must_use]
    pub const fn session_start_time(&self) -> DateTime<Utc> {
        self.session_start_time
    }

    /// The shared electrode table.
    #[must_use]
    pub const fn electrodes(&self) -> &ElectrodeTable {
        &self.electrodes
    }

    /// Mutable access to the electrode table, for populating it.
    pub fn electrodes_mut(&mut self) -> &mut ElectrodeTable {
        &mut self.electrodes
    }

    /// Add an excitation series to the stimulus area.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`] if a stimulus with the same name exists.
    pub fn add_stimulus(&mut self, series: ExcitationSeries) -> Result<()> {
        if self.stimulus.contains_key(series.name()) {
            return Err(Error::DuplicateName(series.name().to_string(), "stimulus".to_string()));
        }
        debug!(name = series.name(), "attached excitation series");
        self.stimulus.insert(series.name().to_string(), series);
        Ok(())
    }

    /// Add a response series to the acquisition area.
    ///
    /// Verifies at attach time that an attached electrode region stays within
    /// the table and that an excitation link resolves.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`], [`Error::UnresolvedLink`], or
    /// [`Error::ShapeMismatch`].
    pub fn add_response(&mut self, series: ResponseSeries) -> Result<()> {
        self.check_acquisition_name(series.name())?;
        if let Some(region) = series.electrodes() {
            self.check_region(series.name(), region, series.num_electrodes())?;
        }
        if let Some(link) = series.excitation_series() {
            self.resolve(series.name(), "excitation_series", link)?;
        }
        debug!(name = series.name(), "attached response series");
        self.responses.insert(series.name().to_string(), series);
        Ok(())
    }

    /// Add a background-subtracted series to the acquisition area.
    ///
    /// The required `response_series` link must already resolve, and the
    /// column count must agree with the linked response.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`], [`Error::UnresolvedLink`], or
    /// [`Error::ShapeMismatch`].
    pub fn add_background(&mut self, series: BackgroundSubtractedSeries) -> Result<()> {
        self.check_acquisition_name(series.name())?;
        let response = self.resolve(series.name(), "response_series", series.response_series())?;
        if series.num_electrodes() != response.num_electrodes() {
            return Err(Error::ShapeMismatch {
                name: series.name().to_string(),
                columns: series.num_electrodes(),
                referenced: response.num_electrodes(),
            });
        }
        debug!(name = series.name(), "attached background-subtracted series");
        self.background.insert(series.name().to_string(), series);
        Ok(())
    }

    /// Get an excitation series from the stimulus area.
    #[must_use]
    pub fn stimulus(&self, name: &str) -> Option<&ExcitationSeries> {
        self.stimulus.get(name)
    }

    /// Get a response series from the acquisition area.
    #[must_use]
    pub fn response(&self, name: &str) -> Option<&ResponseSeries> {
        self.responses.get(name)
    }

    /// Get a background-subtracted series from the acquisition area.
    #[must_use]
    pub fn background(&self, name: &str) -> Option<&BackgroundSubtractedSeries> {
        self.background.get(name)
    }

    /// Iterate the stimulus area in name order.
    pub fn iter_stimulus(&self) -> impl Iterator<Item = &ExcitationSeries> {
        self.stimulus.values()
    }

    /// Iterate acquisition response series in name order.
    pub fn iter_responses(&self) -> impl Iterator<Item = &ResponseSeries> {
        self.responses.values()
    }

    /// Iterate acquisition background-subtracted series in name order.
    pub fn iter_background(&self) -> impl Iterator<Item = &BackgroundSubtractedSeries> {
        self.background.values()
    }

    /// Resolve a link against this container.
    ///
    /// `owner` and `link_name` identify the instance and field carrying the
    /// link and appear in the error when resolution fails.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedLink`] when no instance of the target type carries
    /// the linked name.
    pub fn resolve<'a, T: LinkTarget>(
        &'a self,
        owner: &str,
        link_name: &str,
        link: &Link<T>,
    ) -> Result<&'a T> {
        T::lookup(self, link.target()).ok_or_else(|| Error::UnresolvedLink {
            name: owner.to_string(),
            link: link_name.to_string(),
            target_type: T::TYPE_NAME.to_string(),
            target: link.target().to_string(),
        })
    }

    /// Resolve a response's excitation link, if it carries one.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedLink`] when the link does not resolve here.
    pub fn excitation_of(&self, series: &ResponseSeries) -> Result<Option<&ExcitationSeries>> {
        series
            .excitation_series()
            .map(|link| self.resolve(series.name(), "excitation_series", link))
            .transpose()
    }

    /// Resolve a background-subtracted series' raw response.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedLink`] when the link does not resolve here.
    pub fn response_of(&self, series: &BackgroundSubtractedSeries) -> Result<&ResponseSeries> {
        self.resolve(series.name(), "response_series", series.response_series())
    }

    /// Re-run every cross-entity invariant over the current object graph.
    ///
    /// Called after a round trip, when persisted links have been re-resolved
    /// against reloaded instances.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedLink`] for a dangling link or out-of-range
    /// electrode reference, [`Error::ShapeMismatch`] for dimensional
    /// disagreement.
    pub fn validate(&self) -> Result<()> {
        for series in self.responses.values() {
            if let Some(region) = series.electrodes() {
                self.check_region(series.name(), region, series.num_electrodes())?;
            }
            if let Some(link) = series.excitation_series() {
                self.resolve(series.name(), "excitation_series", link)?;
            }
        }
        for series in self.background.values() {
            let response = self.resolve(series.name(), "response_series", series.response_series())?;
            if series.num_electrodes() != response.num_electrodes() {
                return Err(Error::ShapeMismatch {
                    name: series.name().to_string(),
                    columns: series.num_electrodes(),
                    referenced: response.num_electrodes(),
                });
            }
        }
        debug!(
            stimulus = self.stimulus.len(),
            responses = self.responses.len(),
            background = self.background.len(),
            "container validated"
        );
        Ok(())
    }

    fn check_acquisition_name(&self, name: &str) -> Result<()> {
        if self.responses.contains_key(name) || self.background.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string(), "acquisition".to_string()));
        }
        Ok(())
    }

    fn check_region(&self, owner: &str, region: &ElectrodeRegion, columns: usize) -> Result<()> {
        for &index in region.indices() {
            if self.electrodes.get(index).is_none() {
                return Err(Error::UnresolvedLink {
                    name: owner.to_string(),
                    link: "electrodes".to_string(),
                    target_type: "electrode table row".to_string(),
                    target: index.to_string(),
                });
            }
        }
        if region.len() != columns {
            return Err(Error::ShapeMismatch {
                name: owner.to_string(),
                columns,
                referenced: region.len(),
            });
        }
        Ok(())
    }

}
