// hx-core/src/units.rs

use uom::si::f64::{
    HeatFluxDensity as UomHeatFluxDensity, HeatTransfer as UomHeatTransfer, Length as UomLength,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type HeatFlux = UomHeatFluxDensity;
pub type HeatTransferCoeff = UomHeatTransfer;
pub type Length = UomLength;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn w_per_m2k(v: f64) -> HeatTransferCoeff {
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;
    HeatTransferCoeff::new::<watt_per_square_meter_kelvin>(v)
}

#[inline]
pub fn w_per_m2(v: f64) -> HeatFlux {
    use uom::si::heat_flux_density::watt_per_square_meter;
    HeatFlux::new::<watt_per_square_meter>(v)
}

/// Read-back helpers, the solver works in plain `f64` internally.
pub mod get {
    use super::*;

    #[inline]
    pub fn celsius(t: Temperature) -> f64 {
        use uom::si::thermodynamic_temperature::degree_celsius;
        t.get::<degree_celsius>()
    }

    #[inline]
    pub fn millimetres(l: Length) -> f64 {
        use uom::si::length::millimeter;
        l.get::<millimeter>()
    }

    #[inline]
    pub fn w_per_m2k(h: HeatTransferCoeff) -> f64 {
        use uom::si::heat_transfer::watt_per_square_meter_kelvin;
        h.get::<watt_per_square_meter_kelvin>()
    }

    #[inline]
    pub fn w_per_m2(q: HeatFlux) -> f64 {
        use uom::si::heat_flux_density::watt_per_square_meter;
        q.get::<watt_per_square_meter>()
    }
}
