//! Common test fixtures for ensemble plotting tests.

/// Common grid specifications for testing.
pub mod grid {
    /// Small regional grid covering an enclosed sea (lat 40..47, lon 27..42).
    pub const REGIONAL: GridSpec = GridSpec {
        width: 16,
        height: 8,
        min_lon: 27.0,
        max_lon: 42.0,
        min_lat: 40.0,
        max_lat: 47.0,
    };

    /// Tiny grid for unit tests.
    pub const TINY: GridSpec = GridSpec {
        width: 4,
        height: 3,
        min_lon: 30.0,
        max_lon: 33.0,
        min_lat: 42.0,
        max_lat: 44.0,
    };

    /// Grid specification for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Ascending longitude axis from `min_lon` to `max_lon` inclusive.
        pub fn lons(&self) -> Vec<f64> {
            linspace(self.min_lon, self.max_lon, self.width)
        }

        /// Ascending latitude axis from `min_lat` to `max_lat` inclusive.
        pub fn lats(&self) -> Vec<f64> {
            linspace(self.min_lat, self.max_lat, self.height)
        }
    }

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        if n <= 1 {
            return vec![start; n];
        }
        let step = (end - start) / (n - 1) as f64;
        (0..n).map(|i| start + step * i as f64).collect()
    }
}

/// Common time values for testing.
pub mod time {
    /// Two timesteps on the first day and one on the next.
    pub const TWO_DAYS: [&str; 3] = ["2021-01-01T00:00", "2021-01-01T12:00", "2021-01-02T00:00"];

    /// Run date matching [`TWO_DAYS`].
    pub const RUN_DATE: &str = "20210101";

    /// Hours since the CF reference `2021-01-01 00:00:00` for [`TWO_DAYS`].
    pub const TWO_DAYS_HOURS: [f64; 3] = [0.0, 12.0, 24.0];

    /// CF units string matching [`TWO_DAYS_HOURS`].
    pub const HOURS_UNITS: &str = "hours since 2021-01-01 00:00:00";
}

/// Sample INI configuration files.
pub mod config {
    /// Salinity configuration reading from `base_path` and writing under
    /// `base_output_path`.
    pub fn salinity_ini(base_path: &str, base_output_path: &str) -> String {
        format!(
            "[default]
basePath = {base_path}
baseOutputPath = {base_output_path}
blackSeaMaskLat = 44.5
blackSeaMaskLon = 40.5

[salinity]
meanFile = mean_{{DATE}}.nc
stdFile = std_{{DATE}}.nc
outputFolder = salinity_{{DATE}}
outputName = salinity_{{DATE}}_{{DEPTH}}.png
meanColorMap = gist_rainbow
meanMinValue = 10
meanMaxValue = 40
meanLevels = 30
stdColorMap = jet
stdMinValue = 0
stdMaxValue = 1
stdLevels = 10
resolution = l
"
        )
    }

    /// Postage-stamp SSH configuration for `members` members under
    /// `ens_root/member_{{INSTANCE}}`, writing to `output_folder`.
    pub fn postage_ini(ens_root: &str, output_folder: &str, members: usize) -> String {
        format!(
            "[default]
baseEnsPath = {ens_root}/member_{{INSTANCE}}

[postcardSsh]
inputFile = ssh_{{DATE}}.nc
resolution = i
colorMap = RdBu_r
minValue = -0.5
maxValue = 0.5
levels = 20
members = {members}
columns = 2
outputFolder = {output_folder}
"
        )
    }
}
