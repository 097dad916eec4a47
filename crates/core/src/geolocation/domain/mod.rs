pub mod geolocator;
