// SPDX-License-Identifier: MIT
//! Text-serialized enumerations

use crate::ser_enum;

ser_enum! {
    /// Wavelength band of an image
    pub enum Bandpass {
        Gamma = "Gamma",
        XRay = "XRay",
        Ultraviolet = "Ultraviolet",
        #[default]
        Visible = "Visible",
        HydrogenAlpha = "HydrogenAlpha",
        Infrared = "IR",
        Microwave = "Microwave",
        Radio = "Radio",
        VisibleNight = "VisibleNight",
    }
}

ser_enum! {
    /// Kind of world a dataset renders onto
    pub enum DataSetType {
        Earth = "Earth",
        Planet = "Planet",
        #[default]
        Sky = "Sky",
        Panorama = "Panorama",
        SolarSystem = "SolarSystem",
        Sandbox = "Sandbox",
    }
}

impl DataSetType {
    /// Numeric code used by the rendering engine
    pub fn to_numeric(&self) -> u32 {
        match self {
            DataSetType::Earth => 0,
            DataSetType::Planet => 1,
            DataSetType::Sky => 2,
            DataSetType::Panorama => 3,
            DataSetType::SolarSystem => 4,
            DataSetType::Sandbox => 5,
        }
    }
}

ser_enum! {
    pub enum FolderType {
        #[default]
        Unspecified = "",
        Earth = "Earth",
        Planet = "Planet",
        Sky = "Sky",
        Panorama = "Panorama",
    }
}

ser_enum! {
    /// Image projection; older documents spell `Tan` as `Tangent`
    pub enum ProjectionType {
        Mercator = "Mercator",
        Equirectangular = "Equirectangular",
        Healpix = "Healpix",
        Tan = "Tan",
        Toast = "Toast",
        Spherical = "Spherical",
        #[default]
        SkyImage = "SkyImage",
        Plotted = "Plotted",
    }
    aliases { "Tangent" => Tan }
}

impl ProjectionType {
    /// Numeric code used by the rendering engine
    pub fn to_numeric(&self) -> u32 {
        match self {
            ProjectionType::Mercator => 0,
            ProjectionType::Equirectangular => 1,
            ProjectionType::Tan => 2,
            ProjectionType::Toast => 3,
            ProjectionType::Spherical => 4,
            ProjectionType::SkyImage => 5,
            ProjectionType::Plotted => 6,
            ProjectionType::Healpix => 7,
        }
    }
}

ser_enum! {
    /// IAU constellation, serialized by its catalog abbreviation
    ///
    /// Serpens is split into its two disjoint regions.
    pub enum Constellation {
        #[default]
        Unspecified = "",
        Andromeda = "AND",
        Antlia = "ANT",
        Apus = "APS",
        Aquarius = "AQR",
        Aquila = "AQL",
        Ara = "ARA",
        Aries = "ARI",
        Auriga = "AUR",
        Bootes = "BOO",
        Caelum = "CAE",
        Camelopardalis = "CAM",
        Cancer = "CNC",
        CanesVenatici = "CVN",
        CanisMajor = "CMA",
        CanisMinor = "CMI",
        Capricornus = "CAP",
        Carina = "CAR",
        Cassiopeia = "CAS",
        Centaurus = "CEN",
        Cepheus = "CEP",
        Cetus = "CET",
        Chamaeleon = "CHA",
        Circinus = "CIR",
        Columba = "COL",
        ComaBerenices = "COM",
        CoronaAustralis = "CRA",
        CoronaBorealis = "CRB",
        Corvus = "CRV",
        Crater = "CRT",
        Crux = "CRU",
        Cygnus = "CYG",
        Delphinus = "DEL",
        Dorado = "DOR",
        Draco = "DRA",
        Equuleus = "EQU",
        Eridanus = "ERI",
        Fornax = "FOR",
        Gemini = "GEM",
        Grus = "GRU",
        Hercules = "HER",
        Horologium = "HOR",
        Hydra = "HYA",
        Hydrus = "HYI",
        Indus = "IND",
        Lacerta = "LAC",
        Leo = "LEO",
        LeoMinor = "LMI",
        Lepus = "LEP",
        Libra = "LIB",
        Lupus = "LUP",
        Lynx = "LYN",
        Lyra = "LYR",
        Mensa = "MEN",
        Microscopium = "MIC",
        Monoceros = "MON",
        Musca = "MUS",
        Norma = "NOR",
        Octans = "OCT",
        Ophiuchus = "OPH",
        Orion = "ORI",
        Pavo = "PAV",
        Pegasus = "PEG",
        Perseus = "PER",
        Phoenix = "PHE",
        Pictor = "PIC",
        Pisces = "PSC",
        PiscisAustrinus = "PSA",
        Puppis = "PUP",
        Pyxis = "PYX",
        Reticulum = "RET",
        Sagitta = "SGE",
        Sagittarius = "SGR",
        Scorpius = "SCO",
        Sculptor = "SCL",
        Scutum = "SCT",
        SerpensCaput = "SER1",
        SerpensCauda = "SER2",
        Sextans = "SEX",
        Taurus = "TAU",
        Telescopium = "TEL",
        Triangulum = "TRI",
        TriangulumAustrale = "TRA",
        Tucana = "TUC",
        UrsaMajor = "UMA",
        UrsaMinor = "UMI",
        Vela = "VEL",
        Virgo = "VIR",
        Volans = "VOL",
        Vulpecula = "VUL",
    }
}

impl Constellation {
    /// Look up a boundary-catalog code; padding whitespace is ignored
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        Self::from_text(code).ok()
    }
}
