//! One interface over persisted and generated samples.
//!
//! Endpoints that fall back to synthetic data when a pond has no rows used
//! to fake record-shaped objects; here the two cases are an explicit sum
//! type and consumers cannot tell them apart by accident.

use chrono::NaiveDateTime;

use crate::entities::water_quality;
use crate::quality::Reading;
use crate::synthetic::SyntheticSample;

#[derive(Clone, Debug)]
pub enum SampleRecord {
    Persisted(water_quality::Model),
    Synthetic(SyntheticSample),
}

impl SampleRecord {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, SampleRecord::Synthetic(_))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            SampleRecord::Persisted(m) => m.timestamp,
            SampleRecord::Synthetic(s) => s.timestamp,
        }
    }

    pub fn reading(&self) -> Reading {
        match self {
            SampleRecord::Persisted(m) => Reading {
                temperature: m.temperature,
                dissolved_oxygen: m.dissolved_oxygen,
                ph: m.ph,
                ammonia: m.ammonia,
            },
            SampleRecord::Synthetic(s) => Reading {
                temperature: s.temperature,
                dissolved_oxygen: s.dissolved_oxygen,
                ph: s.ph,
                ammonia: s.ammonia,
            },
        }
    }

    pub fn temperature(&self) -> f64 {
        self.reading().temperature
    }

    pub fn dissolved_oxygen(&self) -> f64 {
        self.reading().dissolved_oxygen
    }

    pub fn ph(&self) -> f64 {
        self.reading().ph
    }

    pub fn ammonia(&self) -> f64 {
        self.reading().ammonia
    }

    // Optional probes: persisted rows may be missing them, generated ones
    // always carry a value.

    pub fn turbidity(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.turbidity,
            SampleRecord::Synthetic(s) => Some(s.turbidity),
        }
    }

    pub fn conductivity(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.conductivity,
            SampleRecord::Synthetic(s) => Some(s.conductivity),
        }
    }

    pub fn water_level(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.water_level,
            SampleRecord::Synthetic(s) => Some(s.water_level),
        }
    }

    pub fn cod(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.cod,
            SampleRecord::Synthetic(s) => Some(s.cod),
        }
    }

    pub fn heavy_metals(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.heavy_metals,
            SampleRecord::Synthetic(s) => Some(s.heavy_metals),
        }
    }

    pub fn residual_chlorine(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.residual_chlorine,
            SampleRecord::Synthetic(s) => Some(s.residual_chlorine),
        }
    }

    pub fn total_phosphorus(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.total_phosphorus,
            SampleRecord::Synthetic(s) => Some(s.total_phosphorus),
        }
    }

    pub fn total_nitrogen(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.total_nitrogen,
            SampleRecord::Synthetic(s) => Some(s.total_nitrogen),
        }
    }

    pub fn coliform(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.coliform,
            SampleRecord::Synthetic(s) => Some(s.coliform),
        }
    }

    pub fn algae(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.algae,
            SampleRecord::Synthetic(s) => Some(s.algae),
        }
    }

    pub fn biotoxicity(&self) -> Option<f64> {
        match self {
            SampleRecord::Persisted(m) => m.biotoxicity,
            SampleRecord::Synthetic(s) => Some(s.biotoxicity),
        }
    }
}
