//! User facing messages, kept in one place so every layer reports the same text.

pub const PET_FIELD_REQUIRED: &str = "required pet fields were not provided";
pub const PET_NAME_TOO_LONG: &str = "pet name must be at most 100 characters";
pub const PET_BREED_TOO_LONG: &str = "pet breed must be at most 50 characters";
pub const PET_BIRTH_DATE_IN_FUTURE: &str = "birth date cannot be in the future";
pub const PET_MICROCHIP_TOO_LONG: &str = "microchip number must be at most 30 characters";
pub const PET_NOT_FOUND: &str = "pet not found";
pub const PET_MICROCHIP_ALREADY_REGISTERED: &str = "microchip number already registered";
pub const PET_UPDATE_EMPTY: &str = "at least one field must be provided for update";

pub const VERSION_MISMATCH: &str = "expected version mismatch";

pub const VACCINE_FIELD_REQUIRED: &str = "vaccine name must not be blank";
pub const VACCINE_NAME_TOO_LONG: &str = "vaccine name must be at most 100 characters";
pub const VACCINE_DATE_IN_FUTURE: &str = "vaccine application date cannot be in the future";
pub const VACCINE_NEXT_DOSE_NOT_AFTER_APPLICATION: &str =
    "next dose date must be after the application date";
pub const VACCINE_BATCH_TOO_LONG: &str = "batch number must be at most 50 characters";
pub const VETERINARIAN_TOO_LONG: &str = "veterinarian must be at most 100 characters";

pub const DEWORMER_FIELD_REQUIRED: &str = "dewormer product name must not be blank";
pub const DEWORMER_NAME_TOO_LONG: &str = "dewormer product name must be at most 100 characters";
pub const DEWORMER_DATE_IN_FUTURE: &str = "dewormer application date cannot be in the future";
pub const DEWORMER_NEXT_NOT_AFTER_APPLICATION: &str =
    "next application date must be after the application date";
pub const DEWORMER_DOSAGE_TOO_LONG: &str = "dosage must be at most 50 characters";

pub const REMINDER_FIELD_REQUIRED: &str = "reminder title must not be blank";
pub const REMINDER_TITLE_TOO_LONG: &str = "reminder title must be at most 100 characters";
pub const REMINDER_DATE_IN_PAST: &str = "reminder date cannot be in the past";
