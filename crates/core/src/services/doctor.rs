use crate::EntityService;
use ward_wire::Doctor;

pub type DoctorService = EntityService<Doctor>;
