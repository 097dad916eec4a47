pub mod ip_api_geolocator;
